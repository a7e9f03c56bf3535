//! Streaming decoders for HTTP/1.x messages
//!
//! Every decoder here implements [`tokio_util::codec::Decoder`], so it can be
//! driven by hand over a [`BytesMut`](bytes::BytesMut) or wrapped in a
//! [`FramedRead`](tokio_util::codec::FramedRead).
//!
//! # Architecture
//!
//! - Low level, one message piece per item:
//!   - [`HeaderDecoder`]: request or status line plus header fields
//!   - [`PayloadDecoder`]: fixed length, chunked, until-close or empty bodies
//!   - [`MessageDecoder`]: heads followed by their payloads, message after message
//!
//! - High level, one complete request per item:
//!   - [`RequestCodec`]: drives an [`HttpParser`](crate::parser::HttpParser)
//!     and yields `http::Request<Bytes>` values
//!
//! # Example
//!
//! ```
//! use micro_http_parser::codec::RequestCodec;
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! let mut codec = RequestCodec::new();
//! let mut buffer = BytesMut::from("GET /a HTTP/1.1\r\n\r\nGET /b HTTP/1.1\r\n\r\n");
//!
//! let first = codec.decode(&mut buffer).unwrap().unwrap();
//! let second = codec.decode(&mut buffer).unwrap().unwrap();
//! assert_eq!(first.uri(), "/a");
//! assert_eq!(second.uri(), "/b");
//! ```

mod body;
mod header;
mod message_decoder;
mod request_codec;

pub use body::PayloadDecoder;
pub use header::{HeaderDecoder, StartLineProgress};
pub use message_decoder::MessageDecoder;
pub use request_codec::RequestCodec;
