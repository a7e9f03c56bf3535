//! Read-only accessors over a parser state.
//!
//! Callers that only need the decoded method, the error code or the status
//! code depend on [`ParserStateView`] instead of the layout of
//! [`ParserState`]. Every accessor is a pure read: no allocation, no
//! mutation, and repeated calls without an intervening parse return the same
//! value.
//!
//! # Example
//!
//! ```
//! use micro_http_parser::parser::HttpParser;
//! use micro_http_parser::protocol::{get_error_name, get_method_name, ParserStateView};
//!
//! let mut parser = HttpParser::request();
//! parser.execute(&mut (), b"GET / HTTP/1.1\r\n\r\n");
//!
//! assert_eq!(get_method_name(&parser), "GET");
//! assert_eq!(get_error_name(&parser), "HPE_OK");
//! assert_eq!(parser.status_code(), 0);
//! ```

use crate::protocol::{method_str, ParserState};

/// The four observations a caller may make on a parser state.
///
/// All strings are `'static`: they live in the method and error tables and
/// are valid for the whole process.
pub trait ParserStateView {
    /// The decoded request method, or `"<unknown>"` before a method is known.
    fn method_name(&self) -> &'static str;

    /// The short identifier of the current error, `"HPE_OK"` when none occurred.
    fn error_name(&self) -> &'static str;

    /// The human readable sentence of the current error, `"success"` when none occurred.
    fn error_description(&self) -> &'static str;

    /// The response status code, `0` until a status line has been parsed.
    fn status_code(&self) -> u16;
}

impl ParserStateView for ParserState {
    #[inline]
    fn method_name(&self) -> &'static str {
        method_str(self.method)
    }

    #[inline]
    fn error_name(&self) -> &'static str {
        self.http_errno.name()
    }

    #[inline]
    fn error_description(&self) -> &'static str {
        self.http_errno.description()
    }

    #[inline]
    fn status_code(&self) -> u16 {
        self.status_code
    }
}

impl<T: ParserStateView + ?Sized> ParserStateView for &T {
    #[inline]
    fn method_name(&self) -> &'static str {
        (**self).method_name()
    }

    #[inline]
    fn error_name(&self) -> &'static str {
        (**self).error_name()
    }

    #[inline]
    fn error_description(&self) -> &'static str {
        (**self).error_description()
    }

    #[inline]
    fn status_code(&self) -> u16 {
        (**self).status_code()
    }
}

pub fn get_method_name<V: ParserStateView + ?Sized>(state: &V) -> &'static str {
    state.method_name()
}

pub fn get_error_name<V: ParserStateView + ?Sized>(state: &V) -> &'static str {
    state.error_name()
}

pub fn get_error_description<V: ParserStateView + ?Sized>(state: &V) -> &'static str {
    state.error_description()
}

pub fn get_status_code<V: ParserStateView + ?Sized>(state: &V) -> u16 {
    state.status_code()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{HttpErrno, HttpMethod, ParserKind};

    #[test]
    fn fresh_state() {
        let state = ParserState::new(ParserKind::Response);
        assert_eq!(get_method_name(&state), "<unknown>");
        assert_eq!(get_error_name(&state), "HPE_OK");
        assert_eq!(get_error_description(&state), "success");
        assert_eq!(get_status_code(&state), 0);
    }

    #[test]
    fn projects_current_fields() {
        let mut state = ParserState::new(ParserKind::Request);
        state.method = Some(HttpMethod::Post);
        state.http_errno = HttpErrno::InvalidHeaderToken;
        state.status_code = 404;

        assert_eq!(state.method_name(), "POST");
        assert_eq!(state.error_name(), "HPE_INVALID_HEADER_TOKEN");
        assert_eq!(state.error_description(), "invalid character in header");
        assert_eq!(state.status_code(), 404);
    }

    #[test]
    fn reads_are_idempotent() {
        let mut state = ParserState::default();
        state.method = Some(HttpMethod::Get);

        let view: &dyn ParserStateView = &state;
        let first = (view.method_name(), view.error_name(), view.error_description(), view.status_code());
        for _ in 0..3 {
            assert_eq!((view.method_name(), view.error_name(), view.error_description(), view.status_code()), first);
        }
    }
}
