use std::io;
use thiserror::Error;

use crate::protocol::HttpErrno;

/// Longest prefix of a rejected method token kept in [`ParseError::InvalidMethod`].
pub const MAX_METHOD_TOKEN_LEN: usize = 16;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("header size too large, current: {current_size} exceed the limit {max_size}")]
    TooLargeHeader { current_size: usize, max_size: usize },

    #[error("header number exceed the limit {max_num}")]
    TooManyHeaders { max_num: usize },

    #[error("invalid header: {reason}")]
    InvalidHeader { reason: String },

    #[error("invalid http version: {0:?}")]
    InvalidVersion(Option<u8>),

    #[error("invalid http method: {token}")]
    InvalidMethod { token: String },

    #[error("invalid http uri")]
    InvalidUri,

    #[error("invalid http status")]
    InvalidStatus,

    #[error("invalid new line in message head")]
    LfExpected,

    #[error("invalid token in message head")]
    InvalidConstant,

    #[error("invalid content-length header: {reason}")]
    InvalidContentLength { reason: String },

    #[error("transfer-encoding and content-length both present in headers")]
    UnexpectedContentLength,

    #[error("invalid transfer-encoding header: {reason}")]
    InvalidTransferEncoding { reason: String },

    #[error("invalid chunk size: {reason}")]
    InvalidChunkSize { reason: String },

    #[error("invalid chunk delimiter: {reason}")]
    InvalidChunkDelimiter { reason: String },

    #[error("data received after the connection was marked to close")]
    ClosedConnection,

    #[error("stream ended in the middle of a message")]
    UnexpectedEof,

    #[error("parser is paused")]
    Paused,

    #[error("parsing halted by handler: {errno}")]
    CallbackHalted { errno: HttpErrno },

    #[error("parsing halted: {errno}")]
    Halted { errno: HttpErrno },

    #[error("incomplete message: {reason}")]
    IncompleteMessage { reason: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn too_large_header(current_size: usize, max_size: usize) -> Self {
        Self::TooLargeHeader { current_size, max_size }
    }

    pub fn too_many_headers(max_num: usize) -> Self {
        Self::TooManyHeaders { max_num }
    }

    pub fn invalid_header<S: ToString>(str: S) -> Self {
        Self::InvalidHeader { reason: str.to_string() }
    }

    /// Keeps at most [`MAX_METHOD_TOKEN_LEN`] bytes of `token`.
    pub fn invalid_method(token: &[u8]) -> Self {
        let token = &token[..token.len().min(MAX_METHOD_TOKEN_LEN)];
        Self::InvalidMethod { token: String::from_utf8_lossy(token).into_owned() }
    }

    pub fn invalid_content_length<S: ToString>(str: S) -> Self {
        Self::InvalidContentLength { reason: str.to_string() }
    }

    pub fn invalid_transfer_encoding<S: ToString>(str: S) -> Self {
        Self::InvalidTransferEncoding { reason: str.to_string() }
    }

    pub fn invalid_chunk_size<S: ToString>(str: S) -> Self {
        Self::InvalidChunkSize { reason: str.to_string() }
    }

    pub fn invalid_chunk_delimiter<S: ToString>(str: S) -> Self {
        Self::InvalidChunkDelimiter { reason: str.to_string() }
    }

    pub fn callback_halted(errno: HttpErrno) -> Self {
        Self::CallbackHalted { errno }
    }

    pub fn incomplete_message<S: ToString>(str: S) -> Self {
        Self::IncompleteMessage { reason: str.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    /// The error code recorded in the parser state when this error halts parsing.
    #[must_use]
    pub fn errno(&self) -> HttpErrno {
        match self {
            ParseError::TooLargeHeader { .. } | ParseError::TooManyHeaders { .. } => HttpErrno::HeaderOverflow,
            ParseError::InvalidHeader { .. } => HttpErrno::InvalidHeaderToken,
            ParseError::InvalidVersion(_) => HttpErrno::InvalidVersion,
            ParseError::InvalidMethod { .. } => HttpErrno::InvalidMethod,
            ParseError::InvalidUri => HttpErrno::InvalidUrl,
            ParseError::InvalidStatus => HttpErrno::InvalidStatus,
            ParseError::LfExpected | ParseError::InvalidChunkDelimiter { .. } => HttpErrno::LfExpected,
            ParseError::InvalidConstant => HttpErrno::InvalidConstant,
            ParseError::InvalidContentLength { .. } => HttpErrno::InvalidContentLength,
            ParseError::UnexpectedContentLength => HttpErrno::UnexpectedContentLength,
            ParseError::InvalidTransferEncoding { .. } => HttpErrno::InvalidTransferEncoding,
            ParseError::InvalidChunkSize { .. } => HttpErrno::InvalidChunkSize,
            ParseError::ClosedConnection => HttpErrno::ClosedConnection,
            ParseError::UnexpectedEof => HttpErrno::InvalidEofState,
            ParseError::Paused => HttpErrno::Paused,
            ParseError::CallbackHalted { errno } | ParseError::Halted { errno } => *errno,
            ParseError::IncompleteMessage { .. } | ParseError::Io { .. } => HttpErrno::Unknown,
        }
    }
}

impl From<HttpErrno> for ParseError {
    fn from(errno: HttpErrno) -> Self {
        match errno {
            HttpErrno::InvalidEofState => ParseError::UnexpectedEof,
            HttpErrno::ClosedConnection => ParseError::ClosedConnection,
            HttpErrno::Paused => ParseError::Paused,
            HttpErrno::UnexpectedContentLength => ParseError::UnexpectedContentLength,
            HttpErrno::InvalidStatus => ParseError::InvalidStatus,
            HttpErrno::InvalidUrl => ParseError::InvalidUri,
            HttpErrno::LfExpected => ParseError::LfExpected,
            HttpErrno::InvalidConstant => ParseError::InvalidConstant,
            HttpErrno::CbMessageBegin
            | HttpErrno::CbUrl
            | HttpErrno::CbHeaderField
            | HttpErrno::CbHeaderValue
            | HttpErrno::CbHeadersComplete
            | HttpErrno::CbBody
            | HttpErrno::CbMessageComplete
            | HttpErrno::CbStatus => ParseError::callback_halted(errno),
            other => ParseError::Halted { errno: other },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errno_mapping() {
        assert_eq!(ParseError::too_many_headers(64).errno(), HttpErrno::HeaderOverflow);
        assert_eq!(ParseError::too_large_header(9000, 8192).errno(), HttpErrno::HeaderOverflow);
        assert_eq!(ParseError::invalid_method(b"BREW").errno(), HttpErrno::InvalidMethod);
        assert_eq!(ParseError::invalid_chunk_size("xyz").errno(), HttpErrno::InvalidChunkSize);
        assert_eq!(ParseError::callback_halted(HttpErrno::CbUrl).errno(), HttpErrno::CbUrl);
        assert_eq!(ParseError::io(io::Error::other("boom")).errno(), HttpErrno::Unknown);
    }

    #[test]
    fn from_errno_keeps_code() {
        for errno in [
            HttpErrno::ClosedConnection,
            HttpErrno::CbBody,
            HttpErrno::InvalidEofState,
            HttpErrno::Paused,
            HttpErrno::InvalidMethod,
            HttpErrno::HeaderOverflow,
        ] {
            assert_eq!(ParseError::from(errno).errno(), errno);
        }
    }

    #[test]
    fn from_errno_variants() {
        assert!(matches!(ParseError::from(HttpErrno::CbUrl), ParseError::CallbackHalted { .. }));
        assert!(matches!(ParseError::from(HttpErrno::InvalidMethod), ParseError::Halted { .. }));
        assert_eq!(ParseError::from(HttpErrno::InvalidMethod).to_string(), "parsing halted: invalid HTTP method");
    }

    #[test]
    fn invalid_method_token_is_capped() {
        let ParseError::InvalidMethod { token } = ParseError::invalid_method(&[b'X'; 4096]) else {
            panic!("expected an invalid method");
        };
        assert_eq!(token.len(), MAX_METHOD_TOKEN_LEN);
    }

    #[test]
    fn display() {
        assert_eq!(ParseError::invalid_method(b"BREW").to_string(), "invalid http method: BREW");
        assert_eq!(
            ParseError::callback_halted(HttpErrno::CbBody).to_string(),
            "parsing halted by handler: the on_body callback failed"
        );
    }
}
