//! Callbacks fired by [`HttpParser`](crate::parser::HttpParser) while it parses.
//!
//! Every callback returns `true` to continue. Returning `false` halts the
//! parser with the `HPE_CB_*` code of that callback; the parser then refuses
//! further input until it is [reset](crate::parser::HttpParser::reset).

use crate::protocol::ParserState;

/// Receives the pieces of each message in the order they appear on the wire.
///
/// All methods have a default implementation that ignores its input, so an
/// implementor only overrides what it is interested in.
///
/// # Example
///
/// ```
/// use micro_http_parser::parser::{HttpParser, ParserHandler};
///
/// #[derive(Default)]
/// struct UrlCollector(Vec<u8>);
///
/// impl ParserHandler for UrlCollector {
///     fn on_url(&mut self, url: &[u8]) -> bool {
///         self.0.extend_from_slice(url);
///         true
///     }
/// }
///
/// let mut collector = UrlCollector::default();
/// let mut parser = HttpParser::request();
/// parser.execute(&mut collector, b"GET /index.html HTTP/1.1\r\n\r\n");
/// assert_eq!(collector.0, b"/index.html");
/// ```
pub trait ParserHandler {
    /// The first byte of a new message arrived.
    fn on_message_begin(&mut self) -> bool {
        true
    }

    /// The request target of a request line.
    fn on_url(&mut self, _url: &[u8]) -> bool {
        true
    }

    /// The reason phrase of a status line.
    fn on_status(&mut self, _reason: &[u8]) -> bool {
        true
    }

    fn on_header_field(&mut self, _name: &[u8]) -> bool {
        true
    }

    fn on_header_value(&mut self, _value: &[u8]) -> bool {
        true
    }

    /// The head is complete; `state` carries its method, status and framing.
    fn on_headers_complete(&mut self, _state: &ParserState) -> bool {
        true
    }

    /// A piece of the decoded body. Chunked framing is already removed.
    fn on_body(&mut self, _chunk: &[u8]) -> bool {
        true
    }

    fn on_message_complete(&mut self, _state: &ParserState) -> bool {
        true
    }
}

/// Parses without observing anything.
impl ParserHandler for () {}

impl<H: ParserHandler + ?Sized> ParserHandler for &mut H {
    fn on_message_begin(&mut self) -> bool {
        (**self).on_message_begin()
    }

    fn on_url(&mut self, url: &[u8]) -> bool {
        (**self).on_url(url)
    }

    fn on_status(&mut self, reason: &[u8]) -> bool {
        (**self).on_status(reason)
    }

    fn on_header_field(&mut self, name: &[u8]) -> bool {
        (**self).on_header_field(name)
    }

    fn on_header_value(&mut self, value: &[u8]) -> bool {
        (**self).on_header_value(value)
    }

    fn on_headers_complete(&mut self, state: &ParserState) -> bool {
        (**self).on_headers_complete(state)
    }

    fn on_body(&mut self, chunk: &[u8]) -> bool {
        (**self).on_body(chunk)
    }

    fn on_message_complete(&mut self, state: &ParserState) -> bool {
        (**self).on_message_complete(state)
    }
}
