//! Parse error codes.
//!
//! [`HttpErrno`] is the symbolic error recorded in the parser state. Each
//! code owns a short identifier and a human readable sentence, both with
//! `'static` lifetime.

use std::fmt;

macro_rules! http_errnos {
    ($($variant:ident = $code:literal => ($name:literal, $description:literal),)+) => {
        /// The most recent parse error, or [`HttpErrno::Ok`] when none occurred.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum HttpErrno {
            $(
                #[doc = $description]
                $variant = $code,
            )+
        }

        const ERRNOS: &[HttpErrno] = &[$(HttpErrno::$variant,)+];

        impl HttpErrno {
            /// Returns the short identifier, e.g. `"HPE_INVALID_METHOD"`.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(HttpErrno::$variant => $name,)+
                }
            }

            /// Returns the human readable description, e.g. `"invalid HTTP method"`.
            #[must_use]
            pub const fn description(self) -> &'static str {
                match self {
                    $(HttpErrno::$variant => $description,)+
                }
            }
        }
    };
}

http_errnos! {
    Ok = 0 => ("HPE_OK", "success"),
    CbMessageBegin = 1 => ("HPE_CB_message_begin", "the on_message_begin callback failed"),
    CbUrl = 2 => ("HPE_CB_url", "the on_url callback failed"),
    CbHeaderField = 3 => ("HPE_CB_header_field", "the on_header_field callback failed"),
    CbHeaderValue = 4 => ("HPE_CB_header_value", "the on_header_value callback failed"),
    CbHeadersComplete = 5 => ("HPE_CB_headers_complete", "the on_headers_complete callback failed"),
    CbBody = 6 => ("HPE_CB_body", "the on_body callback failed"),
    CbMessageComplete = 7 => ("HPE_CB_message_complete", "the on_message_complete callback failed"),
    CbStatus = 8 => ("HPE_CB_status", "the on_status callback failed"),
    InvalidEofState = 9 => ("HPE_INVALID_EOF_STATE", "stream ended at an unexpected time"),
    HeaderOverflow = 10 => ("HPE_HEADER_OVERFLOW", "too many header bytes seen; overflow detected"),
    ClosedConnection = 11 => ("HPE_CLOSED_CONNECTION", "data received after completed connection: close message"),
    InvalidVersion = 12 => ("HPE_INVALID_VERSION", "invalid HTTP version"),
    InvalidStatus = 13 => ("HPE_INVALID_STATUS", "invalid HTTP status code"),
    InvalidMethod = 14 => ("HPE_INVALID_METHOD", "invalid HTTP method"),
    InvalidUrl = 15 => ("HPE_INVALID_URL", "invalid URL"),
    LfExpected = 16 => ("HPE_LF_EXPECTED", "LF character expected"),
    InvalidHeaderToken = 17 => ("HPE_INVALID_HEADER_TOKEN", "invalid character in header"),
    InvalidContentLength = 18 => ("HPE_INVALID_CONTENT_LENGTH", "invalid character in content-length header"),
    UnexpectedContentLength = 19 => ("HPE_UNEXPECTED_CONTENT_LENGTH", "unexpected content-length header"),
    InvalidChunkSize = 20 => ("HPE_INVALID_CHUNK_SIZE", "invalid character in chunk size header"),
    InvalidConstant = 21 => ("HPE_INVALID_CONSTANT", "invalid constant string"),
    InvalidTransferEncoding = 22 => ("HPE_INVALID_TRANSFER_ENCODING", "request has invalid transfer-encoding"),
    Paused = 23 => ("HPE_PAUSED", "parser is paused"),
    Unknown = 24 => ("HPE_UNKNOWN", "an unknown error occurred"),
}

impl HttpErrno {
    /// Returns `true` for [`HttpErrno::Ok`].
    #[inline]
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, HttpErrno::Ok)
    }

    /// Returns the stable numeric code of this error.
    #[inline]
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Looks up an error by its numeric code.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        ERRNOS.get(usize::from(code)).copied()
    }
}

impl Default for HttpErrno {
    fn default() -> Self {
        HttpErrno::Ok
    }
}

impl fmt::Display for HttpErrno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_error_sentinel() {
        let errno = HttpErrno::default();
        assert!(errno.is_ok());
        assert_eq!(errno.name(), "HPE_OK");
        assert_eq!(errno.description(), "success");
        assert_eq!(errno.to_string(), "success");
    }

    #[test]
    fn codes_follow_table_order() {
        for (index, errno) in ERRNOS.iter().enumerate() {
            assert_eq!(usize::from(errno.code()), index);
            assert_eq!(HttpErrno::from_code(errno.code()), Some(*errno));
        }
        assert_eq!(HttpErrno::from_code(200), None);
    }

    #[test]
    fn every_error_has_name_and_description() {
        for errno in ERRNOS {
            assert!(errno.name().starts_with("HPE_"));
            assert!(!errno.description().is_empty());
        }
        assert_eq!(HttpErrno::InvalidMethod.name(), "HPE_INVALID_METHOD");
        assert_eq!(HttpErrno::InvalidMethod.description(), "invalid HTTP method");
    }
}
