//! Parser configuration.
//!
//! # Example
//!
//! ```
//! use micro_http_parser::config::ParserConfig;
//! use micro_http_parser::protocol::ParserKind;
//!
//! let config = ParserConfig::response().with_max_headers(32).with_max_header_bytes(4 * 1024);
//! assert_eq!(config.kind(), ParserKind::Response);
//! assert_eq!(config.max_headers(), 32);
//! ```

use crate::protocol::ParserKind;

/// Default maximum number of header fields in one message head
pub const DEFAULT_MAX_HEADERS: usize = 64;

/// Default maximum size in bytes of one message head
pub const DEFAULT_MAX_HEADER_BYTES: usize = 8 * 1024;

/// Message kind and head limits of an [`HttpParser`](crate::parser::HttpParser).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    kind: ParserKind,
    max_headers: usize,
    max_header_bytes: usize,
}

impl ParserConfig {
    pub fn new(kind: ParserKind) -> Self {
        Self { kind, max_headers: DEFAULT_MAX_HEADERS, max_header_bytes: DEFAULT_MAX_HEADER_BYTES }
    }

    pub fn request() -> Self {
        Self::new(ParserKind::Request)
    }

    pub fn response() -> Self {
        Self::new(ParserKind::Response)
    }

    /// Heads with more header fields fail with `HPE_HEADER_OVERFLOW`.
    #[must_use]
    pub fn with_max_headers(mut self, max_headers: usize) -> Self {
        self.max_headers = max_headers;
        self
    }

    /// Heads larger than this many bytes fail with `HPE_HEADER_OVERFLOW`.
    #[must_use]
    pub fn with_max_header_bytes(mut self, max_header_bytes: usize) -> Self {
        self.max_header_bytes = max_header_bytes;
        self
    }

    pub fn kind(&self) -> ParserKind {
        self.kind
    }

    pub fn max_headers(&self) -> usize {
        self.max_headers
    }

    pub fn max_header_bytes(&self) -> usize {
        self.max_header_bytes
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::request()
    }
}
