//! The incremental parser driver.
//!
//! - [`HttpParser`]: buffers input, decodes heads and payloads, records
//!   progress and errors in its [`ParserState`](crate::protocol::ParserState)
//! - [`ParserHandler`]: the callbacks fired for each piece of a message
//! - [`ParsedMessage`]: a handler collecting one message into `http` types

mod collector;
mod handler;
mod http_parser;

pub use collector::ParsedMessage;
pub use handler::ParserHandler;
pub use http_parser::HttpParser;
