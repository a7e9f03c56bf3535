//! The decoded head of a request or response.
//!
//! [`MessageHead`] keeps the raw head bytes and records where the start-line
//! parts and each header name and value live inside them, so header fields
//! can be handed to callbacks in wire order without copying.

use bytes::Bytes;
use http::Version;

use crate::protocol::HttpMethod;

/// Byte range `start..end` inside the head bytes.
pub(crate) type Span = (usize, usize);

/// Positions of a header's name and value within the head bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HeaderIndex {
    pub(crate) name: Span,
    pub(crate) value: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StartLine {
    Request { method: HttpMethod, target: Span },
    Response { code: u16, reason: Span },
}

/// A parsed request line or status line together with its header fields.
#[derive(Debug, Clone)]
pub struct MessageHead {
    bytes: Bytes,
    start_line: StartLine,
    version: Version,
    headers: Vec<HeaderIndex>,
}

impl MessageHead {
    pub(crate) fn new(bytes: Bytes, start_line: StartLine, version: Version, headers: Vec<HeaderIndex>) -> Self {
        Self { bytes, start_line, version, headers }
    }

    fn slice(&self, span: Span) -> &[u8] {
        &self.bytes[span.0..span.1]
    }

    /// The request method, `None` for responses.
    pub fn method(&self) -> Option<HttpMethod> {
        match self.start_line {
            StartLine::Request { method, .. } => Some(method),
            StartLine::Response { .. } => None,
        }
    }

    /// The request target as sent, empty for responses.
    pub fn target(&self) -> &[u8] {
        match self.start_line {
            StartLine::Request { target, .. } => self.slice(target),
            StartLine::Response { .. } => &[],
        }
    }

    /// The response status code, `None` for requests.
    pub fn status_code(&self) -> Option<u16> {
        match self.start_line {
            StartLine::Request { .. } => None,
            StartLine::Response { code, .. } => Some(code),
        }
    }

    /// The response reason phrase, empty for requests.
    pub fn reason(&self) -> &[u8] {
        match self.start_line {
            StartLine::Request { .. } => &[],
            StartLine::Response { reason, .. } => self.slice(reason),
        }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn header_count(&self) -> usize {
        self.headers.len()
    }

    /// Header fields as `(name, value)` pairs in the order they were received.
    pub fn headers(&self) -> impl Iterator<Item = (&[u8], &[u8])> + '_ {
        self.headers.iter().map(|index| (self.slice(index.name), self.slice(index.value)))
    }

    /// Every value of the header `name`, matched case-insensitively.
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a [u8]> + 'a {
        self.headers().filter(move |(n, _)| n.eq_ignore_ascii_case(name.as_bytes())).map(|(_, v)| v)
    }

    /// The first value of the header `name`, matched case-insensitively.
    pub fn header<'a>(&'a self, name: &'a str) -> Option<&'a [u8]> {
        self.header_values(name).next()
    }

    /// Whether any comma separated element of a `Connection` header equals `token`.
    pub fn has_connection_token(&self, token: &str) -> bool {
        self.header_values("connection")
            .flat_map(|value| value.split(|b| *b == b','))
            .any(|element| element.trim_ascii().eq_ignore_ascii_case(token.as_bytes()))
    }

    /// Whether the connection may be reused once this message is complete.
    pub fn keep_alive(&self) -> bool {
        match self.version {
            Version::HTTP_11 => !self.has_connection_token("close"),
            _ => self.has_connection_token("keep-alive"),
        }
    }

    /// Whether the message hands the connection over to another protocol.
    ///
    /// Requests upgrade on `CONNECT` or on `Connection: upgrade` with an
    /// `Upgrade` header; responses upgrade on `101 Switching Protocols`.
    pub fn is_upgrade(&self) -> bool {
        match self.start_line {
            StartLine::Request { method, .. } => {
                method.is_connect() || (self.has_connection_token("upgrade") && self.header("upgrade").is_some())
            }
            StartLine::Response { code, .. } => code == 101,
        }
    }
}
