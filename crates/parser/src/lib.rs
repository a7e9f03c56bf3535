//! An incremental HTTP/1.x message parser with read-only state accessors
//!
//! This crate parses requests or responses from input that arrives in
//! arbitrary pieces. The heavy lifting is done by `httparse` and a set of
//! `tokio-util` decoders; on top of them [`HttpParser`](parser::HttpParser)
//! reports each piece of a message through callbacks and records what it has
//! decoded so far in a [`ParserState`](protocol::ParserState).
//!
//! Readers of that state go through [`ParserStateView`](protocol::ParserStateView),
//! four pure accessors returning `'static` strings or plain integers:
//!
//! - the method name, `"<unknown>"` until a request method is known
//! - the error name, `"HPE_OK"` while no error occurred
//! - the error description, `"success"` while no error occurred
//! - the status code, `0` until a status line is parsed
//!
//! # Example
//!
//! ```
//! use micro_http_parser::parser::{HttpParser, ParsedMessage};
//! use micro_http_parser::protocol::{get_error_description, get_error_name, get_method_name, get_status_code};
//!
//! let mut message = ParsedMessage::default();
//! let mut parser = HttpParser::request();
//!
//! parser.execute(&mut message, b"GET /hello HTTP/1.1\r\nHost: localhost\r\n\r\n");
//!
//! assert_eq!(get_method_name(&parser), "GET");
//! assert_eq!(get_error_name(&parser), "HPE_OK");
//! assert_eq!(get_error_description(&parser), "success");
//! assert_eq!(get_status_code(&parser), 0);
//! assert_eq!(message.url(), Some("/hello"));
//!
//! parser.execute(&mut message, b"GET / HTTP/1.1\r\n\r\n");
//! parser.execute(&mut message, b"\x01");
//! assert_eq!(get_error_name(&parser), "HPE_INVALID_METHOD");
//! ```
//!
//! # Modules
//!
//! - [`protocol`]: code tables, parser state, accessors, message types and errors
//! - [`parser`]: the incremental driver and its callbacks
//! - [`codec`]: `tokio-util` decoders for heads, payloads and whole requests
//! - [`config`]: message kind and head limits

pub mod codec;
pub mod config;
pub mod parser;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
