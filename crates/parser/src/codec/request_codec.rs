//! Decoding complete requests on top of [`HttpParser`].
//!
//! [`RequestCodec`] feeds whatever the transport delivers to an
//! [`HttpParser`], collects each message with a [`ParsedMessage`] and hands
//! out finished [`Request`]s in arrival order, bodies included.

use std::collections::VecDeque;
use std::mem;

use bytes::{Bytes, BytesMut};
use http::Request;
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::config::ParserConfig;
use crate::parser::{HttpParser, ParsedMessage, ParserHandler};
use crate::protocol::{ParseError, ParserState, ParserStateView};

/// A [`Decoder`] yielding one `Request<Bytes>` per complete HTTP request.
///
/// Parse errors are reported with the [`ParseError`] matching the error code
/// recorded by the parser; the codec keeps failing after the first one.
///
/// After an upgrade or a `CONNECT` request the codec stops reading `src`:
/// the bytes that follow belong to another protocol and stay in the buffer.
#[derive(Debug)]
pub struct RequestCodec {
    parser: HttpParser,
    pipeline: Pipeline,
}

impl RequestCodec {
    pub fn new() -> Self {
        Self::with_config(ParserConfig::request())
    }

    /// Uses the limits of `config`; the message kind is always request.
    pub fn with_config(config: ParserConfig) -> Self {
        let config =
            ParserConfig::request().with_max_headers(config.max_headers()).with_max_header_bytes(config.max_header_bytes());
        Self { parser: HttpParser::new(config), pipeline: Pipeline::default() }
    }

    /// The underlying parser, e.g. to read its state.
    pub fn parser(&self) -> &HttpParser {
        &self.parser
    }

    pub fn is_upgraded(&self) -> bool {
        self.parser.is_upgraded()
    }

    fn next_request(&mut self) -> Result<Option<Request<Bytes>>, ParseError> {
        if let Some(request) = self.pipeline.completed.pop_front() {
            return request.map(Some);
        }

        let errno = self.parser.state().http_errno();
        if !errno.is_ok() {
            return Err(errno.into());
        }
        Ok(None)
    }
}

impl Default for RequestCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for RequestCodec {
    type Item = Request<Bytes>;
    type Error = ParseError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if !self.pipeline.completed.is_empty() || self.parser.is_upgraded() {
            return self.next_request();
        }

        if !src.is_empty() && self.parser.state().http_errno().is_ok() {
            let data = src.split();
            let consumed = self.parser.execute(&mut self.pipeline, &data);
            trace!(received = data.len(), consumed, "fed request bytes to parser");

            if self.parser.is_upgraded() {
                src.unsplit(self.parser.take_remaining());
            }
        }

        self.next_request()
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(request) = self.decode(src)? {
            return Ok(Some(request));
        }

        if !self.parser.is_upgraded() {
            self.parser.finish(&mut self.pipeline);
        }
        self.next_request()
    }
}

/// Collects requests until the codec hands them out.
#[derive(Debug, Default)]
struct Pipeline {
    current: ParsedMessage,
    completed: VecDeque<Result<Request<Bytes>, ParseError>>,
}

impl ParserHandler for Pipeline {
    fn on_message_begin(&mut self) -> bool {
        self.current.on_message_begin()
    }

    fn on_url(&mut self, url: &[u8]) -> bool {
        self.current.on_url(url)
    }

    fn on_header_field(&mut self, name: &[u8]) -> bool {
        self.current.on_header_field(name)
    }

    fn on_header_value(&mut self, value: &[u8]) -> bool {
        self.current.on_header_value(value)
    }

    fn on_headers_complete(&mut self, state: &ParserState) -> bool {
        self.current.on_headers_complete(state)
    }

    fn on_body(&mut self, chunk: &[u8]) -> bool {
        self.current.on_body(chunk)
    }

    fn on_message_complete(&mut self, state: &ParserState) -> bool {
        if !self.current.on_message_complete(state) {
            return false;
        }

        trace!(method = state.method_name(), "request complete");
        let message = mem::take(&mut self.current);
        self.completed.push_back(message.into_request());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Method, Version};

    #[test]
    fn request_split_across_reads() {
        let mut codec = RequestCodec::new();
        let mut buffer = BytesMut::from("POST /echo HTTP/1.1\r\nContent-Length: 11\r\n\r\nhello");

        assert!(codec.decode(&mut buffer).unwrap().is_none());
        assert!(buffer.is_empty());

        buffer.extend_from_slice(b" world");
        let request = codec.decode(&mut buffer).unwrap().unwrap();

        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.body().as_ref(), b"hello world");
        assert!(codec.decode(&mut buffer).unwrap().is_none());
    }

    #[test]
    fn http10_request() {
        let mut codec = RequestCodec::new();
        let mut buffer = BytesMut::from("GET / HTTP/1.0\r\n\r\n");

        let request = codec.decode(&mut buffer).unwrap().unwrap();

        assert_eq!(request.version(), Version::HTTP_10);
        assert!(!codec.parser().state().should_keep_alive());
    }

    #[test]
    fn invalid_request() {
        let mut codec = RequestCodec::new();
        let mut buffer = BytesMut::from("GET / HTTP/1.1\r\nContent-Length: 1\r\nTransfer-Encoding: chunked\r\n\r\n");

        assert!(matches!(codec.decode(&mut buffer), Err(ParseError::UnexpectedContentLength)));
        assert_eq!(codec.parser().error_name(), "HPE_UNEXPECTED_CONTENT_LENGTH");
        assert!(codec.decode(&mut BytesMut::from("GET / HTTP/1.1\r\n\r\n")).is_err());
    }

    #[test]
    fn eof_inside_body() {
        let mut codec = RequestCodec::new();
        let mut buffer = BytesMut::from("PUT / HTTP/1.1\r\nContent-Length: 4\r\n\r\nab");

        assert!(codec.decode(&mut buffer).unwrap().is_none());
        assert!(matches!(codec.decode_eof(&mut buffer), Err(ParseError::UnexpectedEof)));
    }

    #[test]
    fn upgrade_keeps_following_bytes() {
        let mut codec = RequestCodec::new();
        let mut buffer =
            BytesMut::from("GET /ws HTTP/1.1\r\nConnection: upgrade\r\nUpgrade: websocket\r\n\r\nframe bytes");

        let request = codec.decode(&mut buffer).unwrap().unwrap();

        assert_eq!(request.headers().get("upgrade").unwrap(), "websocket");
        assert!(codec.is_upgraded());
        assert_eq!(&buffer[..], b"frame bytes");
        assert!(codec.decode(&mut buffer).unwrap().is_none());
        assert_eq!(&buffer[..], b"frame bytes");
    }
}
