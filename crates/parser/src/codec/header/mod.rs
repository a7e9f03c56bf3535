//! Message head decoding.
//!
//! - [`HeaderDecoder`]: parses a request line or status line and its header
//!   fields with `httparse`, enforces the configured limits, and selects the
//!   payload framing from the Content-Length and Transfer-Encoding headers.

mod header_decoder;

pub use header_decoder::HeaderDecoder;
pub use header_decoder::StartLineProgress;
