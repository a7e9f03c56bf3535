//! HTTP body decoding for request and response payloads.
//!
//! # Components
//!
//! - [`ChunkedDecoder`]: Handles chunked transfer encoded payloads
//! - [`LengthDecoder`]: Processes fixed-length payloads
//! - [`PayloadDecoder`]: Main decoder that coordinates the strategies above,
//!   plus bodies that run until the connection closes
//!
//! [`ChunkedDecoder`]: chunked_decoder::ChunkedDecoder
//! [`LengthDecoder`]: length_decoder::LengthDecoder

mod chunked_decoder;
mod length_decoder;
mod payload_decoder;

pub use payload_decoder::PayloadDecoder;
