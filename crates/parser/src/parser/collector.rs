//! A handler that gathers one message into owned values.
//!
//! [`ParsedMessage`] keeps the target, header fields and body of the message
//! currently being parsed, together with the method and status code read from
//! the parser state. A new message clears whatever the previous one left.

use bytes::{Bytes, BytesMut};
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method, Request, Response, StatusCode, Version};

use crate::ensure;
use crate::parser::ParserHandler;
use crate::protocol::{get_method_name, get_status_code, ParseError, ParserState, UNKNOWN_METHOD};

/// The collected pieces of the last message seen by a parser.
///
/// # Example
///
/// ```
/// use micro_http_parser::parser::{HttpParser, ParsedMessage};
///
/// let mut message = ParsedMessage::default();
/// let mut parser = HttpParser::request();
/// parser.execute(&mut message, b"POST /upload HTTP/1.1\r\nContent-Length: 3\r\n\r\nabc");
///
/// let request = message.into_request().unwrap();
/// assert_eq!(request.method(), "POST");
/// assert_eq!(request.uri(), "/upload");
/// assert_eq!(request.body().as_ref(), b"abc");
/// ```
#[derive(Debug, Default)]
pub struct ParsedMessage {
    method: Option<Method>,
    url: Option<String>,
    status_code: Option<u16>,
    version: Option<Version>,
    headers: HeaderMap,
    pending_name: Option<HeaderName>,
    body: BytesMut,
    keep_alive: bool,
    complete: bool,
}

impl ParsedMessage {
    pub fn method(&self) -> Option<&Method> {
        self.method.as_ref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// The response status code; `None` for requests.
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    pub fn version(&self) -> Option<Version> {
        self.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn should_keep_alive(&self) -> bool {
        self.keep_alive
    }

    pub fn is_message_complete(&self) -> bool {
        self.complete
    }

    /// Builds a request from a complete message.
    ///
    /// # Errors
    ///
    /// Fails with [`ParseError::IncompleteMessage`] if the message has not
    /// completed or lacks a method or a target.
    pub fn into_request(self) -> Result<Request<Bytes>, ParseError> {
        ensure!(self.complete, ParseError::incomplete_message("request is not complete"));
        let method = self.method.ok_or_else(|| ParseError::incomplete_message("missing request method"))?;
        let url = self.url.ok_or_else(|| ParseError::incomplete_message("missing request target"))?;

        let mut request = Request::builder()
            .method(method)
            .uri(url)
            .version(self.version.unwrap_or(Version::HTTP_11))
            .body(self.body.freeze())
            .map_err(|_| ParseError::InvalidUri)?;
        *request.headers_mut() = self.headers;
        Ok(request)
    }

    /// Builds a response from a complete message.
    ///
    /// # Errors
    ///
    /// Fails with [`ParseError::IncompleteMessage`] if the message has not
    /// completed or lacks a status code.
    pub fn into_response(self) -> Result<Response<Bytes>, ParseError> {
        ensure!(self.complete, ParseError::incomplete_message("response is not complete"));
        let code = self.status_code.ok_or_else(|| ParseError::incomplete_message("missing status code"))?;
        let status = StatusCode::from_u16(code).map_err(|_| ParseError::InvalidStatus)?;

        let mut response = Response::new(self.body.freeze());
        *response.status_mut() = status;
        *response.version_mut() = self.version.unwrap_or(Version::HTTP_11);
        *response.headers_mut() = self.headers;
        Ok(response)
    }

    fn read_state(&mut self, state: &ParserState) {
        let method_name = get_method_name(state);
        self.method = match method_name {
            UNKNOWN_METHOD => None,
            name => Method::from_bytes(name.as_bytes()).ok(),
        };
        self.status_code = Some(get_status_code(state)).filter(|code| *code != 0);
        self.version = state.version();
        self.keep_alive = state.should_keep_alive();
    }
}

impl ParserHandler for ParsedMessage {
    fn on_message_begin(&mut self) -> bool {
        *self = Self::default();
        true
    }

    fn on_url(&mut self, url: &[u8]) -> bool {
        match std::str::from_utf8(url) {
            Ok(url) => {
                self.url = Some(url.to_owned());
                true
            }
            Err(_) => false,
        }
    }

    fn on_header_field(&mut self, name: &[u8]) -> bool {
        self.pending_name = HeaderName::from_bytes(name).ok();
        self.pending_name.is_some()
    }

    fn on_header_value(&mut self, value: &[u8]) -> bool {
        let (Some(name), Ok(value)) = (self.pending_name.take(), HeaderValue::from_bytes(value)) else {
            return false;
        };
        self.headers.append(name, value);
        true
    }

    fn on_headers_complete(&mut self, state: &ParserState) -> bool {
        self.read_state(state);
        true
    }

    fn on_body(&mut self, chunk: &[u8]) -> bool {
        self.body.extend_from_slice(chunk);
        true
    }

    fn on_message_complete(&mut self, state: &ParserState) -> bool {
        self.read_state(state);
        self.complete = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::HttpParser;
    use crate::protocol::ParserStateView;
    use http::header::{CONTENT_TYPE, HOST};
    use indoc::indoc;

    #[test]
    fn collect_request() {
        let mut message = ParsedMessage::default();
        let mut parser = HttpParser::request();
        let input = indoc! {r##"
        GET /index.html?page=2 HTTP/1.1
        Host: 127.0.0.1:8080
        Accept: text/html
        Accept: application/json

        "##}
        .replace('\n', "\r\n");

        parser.execute(&mut message, input.as_bytes());

        assert!(message.is_message_complete());
        assert!(message.should_keep_alive());
        assert_eq!(message.status_code(), None);

        let request = message.into_request().unwrap();
        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.uri().path(), "/index.html");
        assert_eq!(request.uri().query(), Some("page=2"));
        assert_eq!(request.version(), Version::HTTP_11);
        assert_eq!(request.headers().get(HOST).unwrap(), "127.0.0.1:8080");
        assert_eq!(request.headers().get_all("accept").iter().count(), 2);
        assert!(request.body().is_empty());
    }

    #[test]
    fn collect_chunked_body() {
        let mut message = ParsedMessage::default();
        let mut parser = HttpParser::request();

        parser.execute(&mut message, b"POST /a HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n4\r\nwiki\r\n");
        assert!(!message.is_message_complete());
        assert_eq!(message.body(), b"wiki");

        parser.execute(&mut message, b"5\r\npedia\r\n0\r\n\r\n");
        assert!(message.is_message_complete());
        assert_eq!(message.body(), b"wikipedia");
    }

    #[test]
    fn collect_response() {
        let mut message = ParsedMessage::default();
        let mut parser = HttpParser::response();

        parser.execute(&mut message, b"HTTP/1.1 201 Created\r\nContent-Type: text/plain\r\nContent-Length: 2\r\n\r\nok");

        assert_eq!(message.method(), None);
        let response = message.into_response().unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers().get(CONTENT_TYPE).unwrap(), "text/plain");
        assert_eq!(response.body().as_ref(), b"ok");
    }

    #[test]
    fn incomplete_request() {
        let mut message = ParsedMessage::default();
        let mut parser = HttpParser::request();

        parser.execute(&mut message, b"POST / HTTP/1.1\r\nContent-Length: 10\r\n\r\nabc");

        assert_eq!(message.method(), Some(&Method::POST));
        assert!(matches!(message.into_request(), Err(ParseError::IncompleteMessage { .. })));
    }

    #[test]
    fn next_message_clears_previous() {
        let mut message = ParsedMessage::default();
        let mut parser = HttpParser::request();

        parser.execute(&mut message, b"POST /a HTTP/1.1\r\nX-First: 1\r\nContent-Length: 1\r\n\r\nx");
        parser.execute(&mut message, b"GET /b HTTP/1.1\r\n\r\n");

        assert_eq!(parser.method_name(), "GET");
        assert_eq!(message.url(), Some("/b"));
        assert!(message.headers().get("x-first").is_none());
        assert!(message.body().is_empty());
    }
}
