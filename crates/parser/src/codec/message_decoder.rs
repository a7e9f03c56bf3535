//! HTTP message decoder module
//!
//! Decodes a stream of requests or responses, depending on the configured
//! [`ParserKind`](crate::protocol::ParserKind), in two phases per message:
//!
//! 1. Head parsing with [`HeaderDecoder`]
//! 2. Payload parsing with [`PayloadDecoder`], selected by the head
//!
//! # Example
//!
//! ```
//! use micro_http_parser::codec::MessageDecoder;
//! use micro_http_parser::config::ParserConfig;
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! let mut decoder = MessageDecoder::new(&ParserConfig::request());
//! let mut buffer = BytesMut::from("GET / HTTP/1.1\r\n\r\n");
//!
//! let head = decoder.decode(&mut buffer).unwrap().unwrap();
//! assert!(head.is_header());
//! let eof = decoder.decode(&mut buffer).unwrap().unwrap();
//! assert!(eof.into_payload_item().unwrap().is_eof());
//! ```

use crate::codec::body::PayloadDecoder;
use crate::codec::header::{HeaderDecoder, StartLineProgress};
use crate::config::ParserConfig;
use crate::protocol::{Message, MessageHead, ParseError, PayloadItem, PayloadSize};
use bytes::BytesMut;
use tokio_util::codec::Decoder;

/// A decoder for HTTP messages that handles both heads and payloads
///
/// # State Machine
///
/// The decoder maintains its state through the `payload_decoder` field:
/// - `None`: Currently parsing a head
/// - `Some(PayloadDecoder)`: Currently parsing a payload
#[derive(Debug)]
pub struct MessageDecoder {
    header_decoder: HeaderDecoder,
    payload_decoder: Option<PayloadDecoder>,
}

impl MessageDecoder {
    pub fn new(config: &ParserConfig) -> Self {
        Self { header_decoder: HeaderDecoder::new(config), payload_decoder: None }
    }

    /// Returns true while waiting for the head of the next message
    pub fn is_idle(&self) -> bool {
        self.payload_decoder.is_none()
    }

    /// Start-line values revealed by the latest attempt to decode a head
    pub fn progress(&self) -> StartLineProgress {
        self.header_decoder.progress()
    }

    /// Drops the payload of the current message, the remaining bytes are left untouched
    pub fn skip_payload(&mut self) {
        self.payload_decoder = None;
    }

    fn on_payload(&mut self, item: Option<PayloadItem>) -> Option<Message<(MessageHead, PayloadSize)>> {
        if let Some(PayloadItem::Eof) = item {
            // no need payload decoder in this message now
            self.payload_decoder.take();
        }
        item.map(Message::Payload)
    }
}

impl Decoder for MessageDecoder {
    type Item = Message<(MessageHead, PayloadSize)>;
    type Error = ParseError;

    /// Attempts to decode the next piece of a message from the provided buffer
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Message::Header(_)))`: Successfully decoded a message head
    /// - `Ok(Some(Message::Payload(_)))`: Successfully decoded a payload chunk or its end
    /// - `Ok(None)`: Need more data to proceed
    /// - `Err(_)`: Encountered a parsing error
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        // parse payload if have payload_decoder
        if let Some(payload_decoder) = &mut self.payload_decoder {
            let item = payload_decoder.decode(src)?;
            return Ok(self.on_payload(item));
        }

        let message = match self.header_decoder.decode(src)? {
            Some((head, payload_size)) => {
                self.payload_decoder = Some(payload_size.into());
                Some(Message::Header((head, payload_size)))
            }
            None => None,
        };

        Ok(message)
    }

    /// Like [`decode`](Self::decode), for a stream that has ended
    ///
    /// A partial head or an unfinished framed payload fails with
    /// [`ParseError::UnexpectedEof`].
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(payload_decoder) = &mut self.payload_decoder {
            let item = payload_decoder.decode_eof(src)?;
            return Ok(self.on_payload(item));
        }

        match self.decode(src)? {
            Some(message) => Ok(Some(message)),
            None if src.is_empty() => Ok(None),
            None => Err(ParseError::UnexpectedEof),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipelined_requests() {
        let mut decoder = MessageDecoder::new(&ParserConfig::request());
        let mut buffer = BytesMut::from("POST /a HTTP/1.1\r\nContent-Length: 2\r\n\r\nokGET /b HTTP/1.1\r\n\r\n");

        let Message::Header((head, payload_size)) = decoder.decode(&mut buffer).unwrap().unwrap() else {
            panic!("expected a head");
        };
        assert_eq!(head.target(), b"/a");
        assert_eq!(payload_size, PayloadSize::Length(2));
        assert!(!decoder.is_idle());

        let chunk = decoder.decode(&mut buffer).unwrap().unwrap().into_payload_item().unwrap();
        assert_eq!(chunk.as_bytes().unwrap().as_ref(), b"ok");
        assert!(decoder.decode(&mut buffer).unwrap().unwrap().into_payload_item().unwrap().is_eof());
        assert!(decoder.is_idle());

        let Message::Header((head, payload_size)) = decoder.decode(&mut buffer).unwrap().unwrap() else {
            panic!("expected a head");
        };
        assert_eq!(head.target(), b"/b");
        assert!(payload_size.is_empty());
    }

    #[test]
    fn eof_inside_head() {
        let mut decoder = MessageDecoder::new(&ParserConfig::request());
        let mut buffer = BytesMut::from("GET / HTTP/1.1\r\nHost: exa");

        assert!(decoder.decode(&mut buffer).unwrap().is_none());
        assert!(matches!(decoder.decode_eof(&mut buffer), Err(ParseError::UnexpectedEof)));
    }

    #[test]
    fn eof_between_messages() {
        let mut decoder = MessageDecoder::new(&ParserConfig::request());
        let mut buffer = BytesMut::new();

        assert!(decoder.decode_eof(&mut buffer).unwrap().is_none());
    }

    #[test]
    fn response_until_close() {
        let mut decoder = MessageDecoder::new(&ParserConfig::response());
        let mut buffer = BytesMut::from("HTTP/1.0 200 OK\r\n\r\nhello");

        assert!(decoder.decode(&mut buffer).unwrap().unwrap().is_header());
        let chunk = decoder.decode(&mut buffer).unwrap().unwrap().into_payload_item().unwrap();
        assert_eq!(chunk.as_bytes().unwrap().as_ref(), b"hello");
        assert!(decoder.decode(&mut buffer).unwrap().is_none());

        assert!(decoder.decode_eof(&mut buffer).unwrap().unwrap().into_payload_item().unwrap().is_eof());
        assert!(decoder.is_idle());
    }
}
