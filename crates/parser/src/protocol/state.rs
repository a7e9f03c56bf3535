//! The parser state shared between the driver and its readers.
//!
//! [`ParserState`] is owned and mutated by [`HttpParser`](crate::parser::HttpParser).
//! Everything outside the crate only observes it, either through the getters
//! below or through [`ParserStateView`](crate::protocol::ParserStateView).

use http::Version;

use crate::protocol::{HttpErrno, HttpMethod};

/// Which kind of message a parser expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParserKind {
    #[default]
    Request,
    Response,
}

/// Decoded values and the error code of a parser.
///
/// - `method` is only set once a request line has produced a method token.
/// - `status_code` stays `0` until a status line has been parsed.
/// - `http_errno` stays [`HttpErrno::Ok`] until parsing halts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserState {
    pub(crate) kind: ParserKind,
    pub(crate) method: Option<HttpMethod>,
    pub(crate) http_errno: HttpErrno,
    pub(crate) status_code: u16,
    pub(crate) version: Option<Version>,
    pub(crate) content_length: Option<u64>,
    pub(crate) upgrade: bool,
    pub(crate) keep_alive: bool,
}

impl ParserState {
    pub(crate) fn new(kind: ParserKind) -> Self {
        Self {
            kind,
            method: None,
            http_errno: HttpErrno::Ok,
            status_code: 0,
            version: None,
            content_length: None,
            upgrade: false,
            keep_alive: true,
        }
    }

    /// Clears the per-message fields before the next pipelined message.
    ///
    /// The error code survives: once set, the parser stays halted.
    pub(crate) fn begin_message(&mut self) {
        self.method = None;
        self.status_code = 0;
        self.version = None;
        self.content_length = None;
        self.upgrade = false;
    }

    pub fn kind(&self) -> ParserKind {
        self.kind
    }

    pub fn method(&self) -> Option<HttpMethod> {
        self.method
    }

    pub fn http_errno(&self) -> HttpErrno {
        self.http_errno
    }

    pub fn version(&self) -> Option<Version> {
        self.version
    }

    /// The Content-Length of the current message, if it declared one.
    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    /// Whether the current message switches protocols (upgrade or CONNECT).
    pub fn is_upgrade(&self) -> bool {
        self.upgrade
    }

    /// Whether the connection may carry another message after this one.
    ///
    /// HTTP/1.1 defaults to keep-alive unless `Connection: close` was sent,
    /// HTTP/1.0 only keeps the connection with `Connection: keep-alive`.
    pub fn should_keep_alive(&self) -> bool {
        self.keep_alive
    }

    pub fn is_paused(&self) -> bool {
        self.http_errno == HttpErrno::Paused
    }
}

impl Default for ParserState {
    fn default() -> Self {
        Self::new(ParserKind::default())
    }
}
