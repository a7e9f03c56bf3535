//! The incremental HTTP/1.x parser.
//!
//! [`HttpParser`] accepts input in arbitrary slices, keeps whatever it cannot
//! decode yet, and reports every piece of every message to a
//! [`ParserHandler`]. Its progress and the first error it hits are recorded in
//! a [`ParserState`], observable through [`ParserStateView`].
//!
//! # Example
//!
//! ```
//! use micro_http_parser::parser::HttpParser;
//! use micro_http_parser::protocol::ParserStateView;
//!
//! let mut parser = HttpParser::response();
//!
//! parser.execute(&mut (), b"HTTP/1.1 40");
//! assert_eq!(parser.status_code(), 0);
//!
//! parser.execute(&mut (), b"4 Not Found\r\nContent-Length: 0\r\n\r\n");
//! assert_eq!(parser.status_code(), 404);
//! assert_eq!(parser.error_name(), "HPE_OK");
//! ```

use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::{debug, trace, warn};

use crate::codec::MessageDecoder;
use crate::config::ParserConfig;
use crate::ensure;
use crate::parser::ParserHandler;
use crate::protocol::{
    HttpErrno, Message, MessageHead, ParseError, ParserState, ParserStateView, PayloadItem, PayloadSize,
};

/// An incremental parser for a stream of HTTP requests or responses.
///
/// Once an error is recorded the parser ignores all input until [`reset`](Self::reset).
#[derive(Debug)]
pub struct HttpParser {
    config: ParserConfig,
    state: ParserState,
    decoder: MessageDecoder,
    buffer: BytesMut,
    in_message: bool,
    closed: bool,
    upgraded: bool,
}

impl HttpParser {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            config,
            state: ParserState::new(config.kind()),
            decoder: MessageDecoder::new(&config),
            buffer: BytesMut::new(),
            in_message: false,
            closed: false,
            upgraded: false,
        }
    }

    /// A parser for requests with the default limits.
    pub fn request() -> Self {
        Self::new(ParserConfig::request())
    }

    /// A parser for responses with the default limits.
    pub fn response() -> Self {
        Self::new(ParserConfig::response())
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn state(&self) -> &ParserState {
        &self.state
    }

    /// Whether the last message switched protocols.
    ///
    /// The parser stops after such a message; see [`take_remaining`](Self::take_remaining).
    pub fn is_upgraded(&self) -> bool {
        self.upgraded
    }

    /// Feeds `data` to the parser and returns how many of its bytes were consumed.
    ///
    /// All of `data` counts as consumed unless parsing halted on an error or
    /// an upgrade, in which case the bytes still buffered are not. A partial
    /// head stays buffered until it completes, so a head rejected after being
    /// split across calls reports `0` even if earlier calls reported its first
    /// bytes as consumed.
    /// Returns `0` without looking at `data` if an error or a pause is
    /// already recorded. An empty slice does nothing, use [`finish`](Self::finish)
    /// to signal the end of the stream.
    pub fn execute<H: ParserHandler + ?Sized>(&mut self, handler: &mut H, data: &[u8]) -> usize {
        if !self.state.http_errno.is_ok() || self.upgraded || data.is_empty() {
            return 0;
        }

        self.buffer.extend_from_slice(data);

        match self.drive(handler) {
            Ok(()) if self.upgraded => data.len().saturating_sub(self.buffer.len()),
            Ok(()) => data.len(),
            Err(e) => {
                self.fail(e);
                data.len().saturating_sub(self.buffer.len())
            }
        }
    }

    /// Signals that the stream has ended.
    ///
    /// Completes a response whose body lasts until the connection closes.
    /// Records `HPE_INVALID_EOF_STATE` if a message is left unfinished, does
    /// nothing between messages.
    pub fn finish<H: ParserHandler + ?Sized>(&mut self, handler: &mut H) {
        if !self.state.http_errno.is_ok() || self.upgraded {
            return;
        }

        if let Err(e) = self.drive_eof(handler) {
            self.fail(e);
        }
        self.closed = true;
    }

    /// Pauses or resumes the parser.
    ///
    /// Pausing records `HPE_PAUSED`, resuming clears it. Neither affects a
    /// parser that has already failed.
    pub fn pause(&mut self, paused: bool) {
        match (paused, self.state.http_errno) {
            (true, HttpErrno::Ok) => self.state.http_errno = HttpErrno::Paused,
            (false, HttpErrno::Paused) => self.state.http_errno = HttpErrno::Ok,
            _ => {}
        }
    }

    /// Returns the parser to a fresh state of the same kind and limits.
    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }

    /// Takes the bytes buffered after the point where parsing stopped.
    ///
    /// After an upgrade these belong to the new protocol.
    pub fn take_remaining(&mut self) -> BytesMut {
        self.buffer.split()
    }

    fn drive<H: ParserHandler + ?Sized>(&mut self, handler: &mut H) -> Result<(), ParseError> {
        loop {
            if !self.in_message {
                if self.buffer.is_empty() {
                    return Ok(());
                }
                self.begin_message(handler)?;
            }

            let reading_head = self.decoder.is_idle();
            let message = self.decoder.decode(&mut self.buffer);
            if reading_head {
                self.publish_progress();
            }

            match message? {
                Some(message) => self.dispatch(handler, message)?,
                None => return Ok(()),
            }

            if self.upgraded {
                return Ok(());
            }
        }
    }

    fn drive_eof<H: ParserHandler + ?Sized>(&mut self, handler: &mut H) -> Result<(), ParseError> {
        while self.in_message && !self.upgraded {
            let reading_head = self.decoder.is_idle();
            let message = self.decoder.decode_eof(&mut self.buffer);
            if reading_head {
                self.publish_progress();
            }

            match message? {
                Some(message) => self.dispatch(handler, message)?,
                None => return Err(ParseError::UnexpectedEof),
            }
        }
        Ok(())
    }

    fn begin_message<H: ParserHandler + ?Sized>(&mut self, handler: &mut H) -> Result<(), ParseError> {
        ensure!(!self.closed, ParseError::ClosedConnection);

        self.in_message = true;
        self.state.begin_message();
        ensure!(handler.on_message_begin(), ParseError::callback_halted(HttpErrno::CbMessageBegin));
        Ok(())
    }

    /// Copies the start-line values of a head that is still arriving.
    fn publish_progress(&mut self) {
        let progress = self.decoder.progress();
        if progress.method.is_some() {
            self.state.method = progress.method;
        }
        if let Some(status_code) = progress.status_code {
            self.state.status_code = status_code;
        }
    }

    fn dispatch<H: ParserHandler + ?Sized>(
        &mut self,
        handler: &mut H,
        message: Message<(MessageHead, PayloadSize)>,
    ) -> Result<(), ParseError> {
        match message {
            Message::Header((head, payload_size)) => self.on_head(handler, &head, payload_size),
            Message::Payload(PayloadItem::Chunk(bytes)) => {
                ensure!(handler.on_body(&bytes), ParseError::callback_halted(HttpErrno::CbBody));
                Ok(())
            }
            Message::Payload(PayloadItem::Eof) => self.complete_message(handler),
        }
    }

    fn on_head<H: ParserHandler + ?Sized>(
        &mut self,
        handler: &mut H,
        head: &MessageHead,
        payload_size: PayloadSize,
    ) -> Result<(), ParseError> {
        self.state.method = head.method();
        self.state.status_code = head.status_code().unwrap_or(0);
        self.state.version = Some(head.version());
        self.state.content_length = payload_size.length();
        self.state.upgrade = head.is_upgrade();
        self.state.keep_alive = head.keep_alive() && !payload_size.is_until_close();

        trace!(
            method = self.state.method_name(),
            status_code = self.state.status_code,
            ?payload_size,
            upgrade = self.state.upgrade,
            "decoded message head"
        );

        match head.status_code() {
            Some(_) => ensure!(handler.on_status(head.reason()), ParseError::callback_halted(HttpErrno::CbStatus)),
            None => ensure!(handler.on_url(head.target()), ParseError::callback_halted(HttpErrno::CbUrl)),
        }

        for (name, value) in head.headers() {
            ensure!(handler.on_header_field(name), ParseError::callback_halted(HttpErrno::CbHeaderField));
            ensure!(handler.on_header_value(value), ParseError::callback_halted(HttpErrno::CbHeaderValue));
        }

        ensure!(handler.on_headers_complete(&self.state), ParseError::callback_halted(HttpErrno::CbHeadersComplete));

        if self.state.upgrade {
            self.decoder.skip_payload();
            self.upgraded = true;
            return self.complete_message(handler);
        }
        Ok(())
    }

    fn complete_message<H: ParserHandler + ?Sized>(&mut self, handler: &mut H) -> Result<(), ParseError> {
        self.in_message = false;
        if !self.state.keep_alive {
            self.closed = true;
        }

        trace!(keep_alive = self.state.keep_alive, "message complete");
        ensure!(handler.on_message_complete(&self.state), ParseError::callback_halted(HttpErrno::CbMessageComplete));
        Ok(())
    }

    fn fail(&mut self, error: ParseError) {
        let errno = error.errno();
        match error {
            ParseError::CallbackHalted { .. } => debug!(errno = errno.name(), "handler halted parsing"),
            _ => warn!(errno = errno.name(), %error, "failed to parse http message"),
        }
        self.state.http_errno = errno;
    }
}

impl ParserStateView for HttpParser {
    #[inline]
    fn method_name(&self) -> &'static str {
        self.state.method_name()
    }

    #[inline]
    fn error_name(&self) -> &'static str {
        self.state.error_name()
    }

    #[inline]
    fn error_description(&self) -> &'static str {
        self.state.error_description()
    }

    #[inline]
    fn status_code(&self) -> u16 {
        self.state.status_code()
    }
}
