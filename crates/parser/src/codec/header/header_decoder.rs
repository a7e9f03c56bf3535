//! Message head decoder for HTTP/1.x requests and responses.
//!
//! The decoder runs `httparse` over the buffered bytes and, once a head is
//! complete, splits it off the buffer as a [`MessageHead`]. Header names and
//! values are not copied: their byte ranges inside the head are recorded
//! instead.
//!
//! `httparse` is not incremental, so every call re-parses the buffered head
//! from the start. While a head is still partial the decoder publishes what
//! the start line has revealed so far (the method token of a request, the
//! status code of a response) through [`HeaderDecoder::progress`].
//!
//! # Limits
//!
//! Both the number of header fields and the size of the head are bounded by
//! [`ParserConfig`]; either overflow fails with a [`ParseError`] that maps to
//! `HPE_HEADER_OVERFLOW`.

use bytes::BytesMut;
use http::Version;
use httparse::{Error, Status};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::config::ParserConfig;
use crate::ensure;
use crate::protocol::{HeaderIndex, HttpMethod, MessageHead, ParseError, ParserKind, PayloadSize, StartLine};

/// Start-line values seen during the latest decode call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StartLineProgress {
    pub method: Option<HttpMethod>,
    pub status_code: Option<u16>,
}

/// Decoder for HTTP message heads implementing the [`Decoder`] trait.
///
/// Produces the parsed [`MessageHead`] together with the [`PayloadSize`] that
/// its Content-Length and Transfer-Encoding headers call for.
#[derive(Debug)]
pub struct HeaderDecoder {
    kind: ParserKind,
    max_headers: usize,
    max_header_bytes: usize,
    progress: StartLineProgress,
}

/// A complete head located inside the buffer, before it is split off.
struct RawHead {
    start_line: StartLine,
    version: Version,
    headers: Vec<HeaderIndex>,
    len: usize,
}

impl HeaderDecoder {
    pub fn new(config: &ParserConfig) -> Self {
        Self {
            kind: config.kind(),
            max_headers: config.max_headers(),
            max_header_bytes: config.max_header_bytes(),
            progress: StartLineProgress::default(),
        }
    }

    pub fn progress(&self) -> StartLineProgress {
        self.progress
    }

    fn parse_request(&mut self, buf: &[u8]) -> Result<Option<RawHead>, ParseError> {
        let mut headers = vec![httparse::EMPTY_HEADER; self.max_headers];
        let mut req = httparse::Request::new(&mut headers);
        let status = req.parse(buf);

        // httparse fills the method as soon as its token is terminated
        if let Some(token) = req.method {
            let method = HttpMethod::from_bytes(token.as_bytes()).ok_or_else(|| ParseError::invalid_method(token.as_bytes()))?;
            self.progress.method = Some(method);
        }

        let body_offset = match status {
            Ok(Status::Complete(body_offset)) => body_offset,
            Ok(Status::Partial) => return Ok(None),
            Err(Error::Token) if req.method.is_some() => return Err(ParseError::InvalidUri),
            Err(Error::Token) => {
                let token = buf.split(u8::is_ascii_whitespace).next().unwrap_or_default();
                return Err(ParseError::invalid_method(token));
            }
            Err(e) => return Err(self.head_error(e)),
        };

        ensure!(body_offset <= self.max_header_bytes, ParseError::too_large_header(body_offset, self.max_header_bytes));

        let version = http_version(req.version)?;
        let method = self.progress.method.ok_or_else(|| ParseError::invalid_method(b""))?;
        let path = req.path.ok_or(ParseError::InvalidUri)?;

        Ok(Some(RawHead {
            start_line: StartLine::Request { method, target: span(buf, path.as_bytes()) },
            version,
            headers: record_headers(buf, req.headers),
            len: body_offset,
        }))
    }

    fn parse_response(&mut self, buf: &[u8]) -> Result<Option<RawHead>, ParseError> {
        let mut headers = vec![httparse::EMPTY_HEADER; self.max_headers];
        let mut res = httparse::Response::new(&mut headers);
        let status = res.parse(buf);

        // httparse fills the code before validating the rest of the status line
        if status.is_ok() {
            self.progress.status_code = res.code;
        }

        let body_offset = match status {
            Ok(Status::Complete(body_offset)) => body_offset,
            Ok(Status::Partial) => return Ok(None),
            Err(Error::Token) => return Err(ParseError::InvalidConstant),
            Err(e) => return Err(self.head_error(e)),
        };

        ensure!(body_offset <= self.max_header_bytes, ParseError::too_large_header(body_offset, self.max_header_bytes));

        let version = http_version(res.version)?;
        let code = res.code.ok_or(ParseError::InvalidStatus)?;
        let reason = res.reason.unwrap_or_default();

        Ok(Some(RawHead {
            start_line: StartLine::Response { code, reason: span(buf, reason.as_bytes()) },
            version,
            headers: record_headers(buf, res.headers),
            len: body_offset,
        }))
    }

    fn head_error(&self, e: Error) -> ParseError {
        match e {
            Error::TooManyHeaders => ParseError::too_many_headers(self.max_headers),
            Error::Version => ParseError::InvalidVersion(None),
            Error::Status => ParseError::InvalidStatus,
            Error::NewLine => ParseError::LfExpected,
            e => ParseError::invalid_header(e),
        }
    }
}

impl Decoder for HeaderDecoder {
    type Item = (MessageHead, PayloadSize);
    type Error = ParseError;

    /// Attempts to decode a message head from the provided bytes buffer.
    ///
    /// # Returns
    ///
    /// - `Ok(Some((head, payload_size)))` if a complete head was parsed and split off `src`
    /// - `Ok(None)` if more data is needed
    /// - `Err(ParseError)` if parsing failed
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        self.progress = StartLineProgress::default();

        if src.is_empty() {
            return Ok(None);
        }

        let parsed = match self.kind {
            ParserKind::Request => self.parse_request(src)?,
            ParserKind::Response => self.parse_response(src)?,
        };

        let Some(raw) = parsed else {
            ensure!(src.len() <= self.max_header_bytes, ParseError::too_large_header(src.len(), self.max_header_bytes));
            return Ok(None);
        };

        trace!(head_size = raw.len, header_count = raw.headers.len(), "parsed message head");

        let head_bytes = src.split_to(raw.len).freeze();
        let head = MessageHead::new(head_bytes, raw.start_line, raw.version, raw.headers);
        let payload_size = parse_payload(&head)?;

        Ok(Some((head, payload_size)))
    }
}

fn http_version(version: Option<u8>) -> Result<Version, ParseError> {
    match version {
        Some(0) => Ok(Version::HTTP_10),
        Some(1) => Ok(Version::HTTP_11),
        // Currently HTTP/2 and HTTP/3 not supported
        v => Err(ParseError::InvalidVersion(v)),
    }
}

/// Byte range of `part` inside `buf`; non-empty `part` must be a sub-slice of `buf`.
fn span(buf: &[u8], part: &[u8]) -> (usize, usize) {
    // httparse may hand out a static "" for an absent reason phrase
    if part.is_empty() {
        return (0, 0);
    }
    let start = part.as_ptr() as usize - buf.as_ptr() as usize;
    (start, start + part.len())
}

fn record_headers(buf: &[u8], headers: &[httparse::Header<'_>]) -> Vec<HeaderIndex> {
    headers.iter().map(|header| HeaderIndex { name: span(buf, header.name.as_bytes()), value: span(buf, header.value) }).collect()
}

/// Determines how the payload following `head` is delimited.
///
/// Follows RFC 9112 section 6.3: responses to which no body is allowed are
/// empty, chunked wins when it is the final transfer coding, a response
/// without framing headers runs until the connection closes.
///
/// # Errors
///
/// Returns `ParseError` if:
/// - Both Content-Length and Transfer-Encoding headers are present
/// - A Content-Length value is invalid, or several disagree
/// - A request uses a transfer coding other than chunked
fn parse_payload(head: &MessageHead) -> Result<PayloadSize, ParseError> {
    let is_response = head.status_code().is_some();
    if let Some(code) = head.status_code() {
        if (100..200).contains(&code) || code == 204 || code == 304 {
            return Ok(PayloadSize::Empty);
        }
    }

    // refer: https://www.rfc-editor.org/rfc/rfc9112.html#name-transfer-encoding
    let te_value = head.header_values("transfer-encoding").last();
    let content_length = parse_content_length(head)?;

    match (te_value, content_length) {
        (None, None) if is_response => Ok(PayloadSize::UntilClose),
        (None, None) => Ok(PayloadSize::Empty),

        (Some(te_value), None) => {
            if is_chunked(te_value) {
                Ok(PayloadSize::Chunked)
            } else if is_response {
                Ok(PayloadSize::UntilClose)
            } else {
                Err(ParseError::invalid_transfer_encoding(String::from_utf8_lossy(te_value)))
            }
        }

        (None, Some(length)) => Ok(PayloadSize::Length(length)),

        (Some(_), Some(_)) => Err(ParseError::UnexpectedContentLength),
    }
}

fn parse_content_length(head: &MessageHead) -> Result<Option<u64>, ParseError> {
    let mut content_length = None;
    for value in head.header_values("content-length") {
        let cl_str = std::str::from_utf8(value).map_err(|_| ParseError::invalid_content_length("value can't to_str"))?.trim();

        ensure!(
            !cl_str.is_empty() && cl_str.bytes().all(|b| b.is_ascii_digit()),
            ParseError::invalid_content_length(format!("value {cl_str} is not u64"))
        );
        let length = cl_str.parse::<u64>().map_err(|_| ParseError::invalid_content_length(format!("value {cl_str} is not u64")))?;

        match content_length {
            Some(previous) if previous != length => {
                return Err(ParseError::invalid_content_length("multiple different values"));
            }
            _ => content_length = Some(length),
        }
    }
    Ok(content_length)
}

/// Checks if a Transfer-Encoding value ends with the chunked coding.
///
/// According to RFC 9112, chunked must be the last encoding if present.
fn is_chunked(header_value: &[u8]) -> bool {
    const CHUNKED: &[u8] = b"chunked";
    header_value.rsplit(|b| *b == b',').next().is_some_and(|last| last.trim_ascii().eq_ignore_ascii_case(CHUNKED))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn request_decoder() -> HeaderDecoder {
        HeaderDecoder::new(&ParserConfig::request())
    }

    fn response_decoder() -> HeaderDecoder {
        HeaderDecoder::new(&ParserConfig::response())
    }

    #[test]
    fn check_is_chunked() {
        assert!(is_chunked(b"chunked"));
        assert!(is_chunked(b"gzip, chunked"));
        assert!(is_chunked(b"gzip, Chunked "));
        assert!(!is_chunked(b"chunked, gzip"));
        assert!(!is_chunked(b"gzip"));
        assert!(!is_chunked(b""));
    }

    #[test]
    fn test_bytes_mut_lens() {
        let str = indoc! {r##"
        GET /index.html HTTP/1.1
        Host: 127.0.0.1:8080
        User-Agent: curl/7.79.1
        Accept: */*

        123"##};

        let mut bytes = BytesMut::from(str);

        assert_eq!(bytes.len(), str.len());

        let result = request_decoder().decode(&mut bytes).unwrap();

        assert!(result.is_some());

        assert_eq!(bytes.len(), 3);
        assert_eq!(&bytes[..], &b"123"[..]);
    }

    #[test]
    fn from_curl() {
        let str = indoc! {r##"
        GET /index.html HTTP/1.1
        Host: 127.0.0.1:8080
        User-Agent: curl/7.79.1
        Accept: */*

        "##};

        let mut buf = BytesMut::from(str);

        let (head, payload_size) = request_decoder().decode(&mut buf).unwrap().unwrap();

        assert!(payload_size.is_empty());

        assert_eq!(head.method(), Some(HttpMethod::Get));
        assert_eq!(head.version(), Version::HTTP_11);
        assert_eq!(head.target(), b"/index.html");
        assert_eq!(head.status_code(), None);

        assert_eq!(head.header_count(), 3);
        assert_eq!(head.header("accept"), Some(&b"*/*"[..]));
        assert_eq!(head.header("host"), Some(&b"127.0.0.1:8080"[..]));
        assert_eq!(head.header("user-agent"), Some(&b"curl/7.79.1"[..]));

        let names = head.headers().map(|(name, _)| name).collect::<Vec<_>>();
        assert_eq!(names, vec![&b"Host"[..], &b"User-Agent"[..], &b"Accept"[..]]);
    }

    #[test]
    fn from_edge() {
        let str = indoc! {r##"
        GET /index/?a=1&b=2&a=3 HTTP/1.1
        Host: 127.0.0.1:8080
        Connection: keep-alive
        Cache-Control: max-age=0
        sec-ch-ua: "#Not_A Brand";v="99", "Microsoft Edge";v="109", "Chromium";v="109"
        sec-ch-ua-mobile: ?0
        sec-ch-ua-platform: "macOS"
        Upgrade-Insecure-Requests: 1
        User-Agent: Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/109.0.0.0 Safari/537.36 Edg/109.0.1518.52
        Accept: text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.9
        Sec-Fetch-Site: none
        Sec-Fetch-Mode: navigate
        Sec-Fetch-User: ?1
        Sec-Fetch-Dest: document
        Accept-Encoding: gzip, deflate, br
        Accept-Language: zh-CN,zh;q=0.9,en-US;q=0.8,en;q=0.7

        "##};

        let mut buf = BytesMut::from(str);

        let (head, payload_size) = request_decoder().decode(&mut buf).unwrap().unwrap();

        assert!(payload_size.is_empty());
        assert!(buf.is_empty());

        assert_eq!(head.method(), Some(HttpMethod::Get));
        assert_eq!(head.target(), b"/index/?a=1&b=2&a=3");
        assert_eq!(head.header_count(), 15);
        assert_eq!(head.header("sec-ch-ua-platform"), Some(&b"\"macOS\""[..]));
        assert_eq!(head.header("Accept-Encoding"), Some(&b"gzip, deflate, br"[..]));
        assert!(head.keep_alive());
        assert!(!head.is_upgrade());
    }

    #[test]
    fn partial_request_reports_method() {
        let mut decoder = request_decoder();

        let mut buf = BytesMut::from("POS");
        assert!(decoder.decode(&mut buf).unwrap().is_none());
        assert_eq!(decoder.progress().method, None);

        let mut buf = BytesMut::from("POST /upload HT");
        assert!(decoder.decode(&mut buf).unwrap().is_none());
        assert_eq!(decoder.progress().method, Some(HttpMethod::Post));
        assert_eq!(buf.len(), 15);
    }

    #[test]
    fn unknown_method_is_rejected() {
        let mut buf = BytesMut::from("BREW /pot HTTP/1.1\r\n\r\n");
        let error = request_decoder().decode(&mut buf).unwrap_err();
        assert!(matches!(error, ParseError::InvalidMethod { ref token } if token == "BREW"));
    }

    #[test]
    fn missing_version_is_rejected() {
        let mut buf = BytesMut::from("GET /\r\n\r\n");
        let error = request_decoder().decode(&mut buf).unwrap_err();
        assert!(matches!(error, ParseError::InvalidUri));
    }

    #[test]
    fn too_many_headers() {
        let config = ParserConfig::request().with_max_headers(2);
        let mut buf = BytesMut::from("GET / HTTP/1.1\r\nA: 1\r\nB: 2\r\nC: 3\r\n\r\n");
        let error = HeaderDecoder::new(&config).decode(&mut buf).unwrap_err();
        assert!(matches!(error, ParseError::TooManyHeaders { max_num: 2 }));
    }

    #[test]
    fn too_large_partial_header() {
        let config = ParserConfig::request().with_max_header_bytes(32);
        let mut buf = BytesMut::from("GET / HTTP/1.1\r\nX-Padding: aaaaaaaaaaaaaaaaaaaaaaaa");
        let error = HeaderDecoder::new(&config).decode(&mut buf).unwrap_err();
        assert!(matches!(error, ParseError::TooLargeHeader { max_size: 32, .. }));
    }

    #[test]
    fn request_payload_size() {
        let mut buf = BytesMut::from("POST / HTTP/1.1\r\nContent-Length: 12\r\n\r\n");
        let (_, payload_size) = request_decoder().decode(&mut buf).unwrap().unwrap();
        assert_eq!(payload_size, PayloadSize::Length(12));

        let mut buf = BytesMut::from("POST / HTTP/1.1\r\nTransfer-Encoding: gzip, chunked\r\n\r\n");
        let (_, payload_size) = request_decoder().decode(&mut buf).unwrap().unwrap();
        assert!(payload_size.is_chunked());

        let mut buf = BytesMut::from("POST / HTTP/1.1\r\nTransfer-Encoding: gzip\r\n\r\n");
        let error = request_decoder().decode(&mut buf).unwrap_err();
        assert!(matches!(error, ParseError::InvalidTransferEncoding { .. }));

        let mut buf = BytesMut::from("POST / HTTP/1.1\r\nContent-Length: 1\r\nTransfer-Encoding: chunked\r\n\r\n");
        let error = request_decoder().decode(&mut buf).unwrap_err();
        assert!(matches!(error, ParseError::UnexpectedContentLength));

        let mut buf = BytesMut::from("POST / HTTP/1.1\r\nContent-Length: +5\r\n\r\n");
        let error = request_decoder().decode(&mut buf).unwrap_err();
        assert!(matches!(error, ParseError::InvalidContentLength { .. }));

        let mut buf = BytesMut::from("POST / HTTP/1.1\r\nContent-Length: 5\r\nContent-Length: 6\r\n\r\n");
        let error = request_decoder().decode(&mut buf).unwrap_err();
        assert!(matches!(error, ParseError::InvalidContentLength { .. }));
    }

    #[test]
    fn response_head() {
        let mut decoder = response_decoder();

        let mut buf = BytesMut::from("HTTP/1.1 404 Not Found\r\nContent-Len");
        assert!(decoder.decode(&mut buf).unwrap().is_none());
        assert_eq!(decoder.progress().status_code, Some(404));

        buf.extend_from_slice(b"gth: 0\r\n\r\n");
        let (head, payload_size) = decoder.decode(&mut buf).unwrap().unwrap();
        assert_eq!(head.status_code(), Some(404));
        assert_eq!(head.reason(), b"Not Found");
        assert_eq!(payload_size, PayloadSize::Length(0));
    }

    #[test]
    fn response_payload_size() {
        let mut buf = BytesMut::from("HTTP/1.1 200 OK\r\n\r\n");
        let (_, payload_size) = response_decoder().decode(&mut buf).unwrap().unwrap();
        assert!(payload_size.is_until_close());

        let mut buf = BytesMut::from("HTTP/1.1 204 No Content\r\nContent-Length: 10\r\n\r\n");
        let (_, payload_size) = response_decoder().decode(&mut buf).unwrap().unwrap();
        assert!(payload_size.is_empty());

        let mut buf = BytesMut::from("HTTP/1.1 200 OK\r\nTransfer-Encoding: gzip\r\n\r\n");
        let (_, payload_size) = response_decoder().decode(&mut buf).unwrap().unwrap();
        assert!(payload_size.is_until_close());
    }

    #[test]
    fn invalid_status() {
        let mut buf = BytesMut::from("HTTP/1.1 2x0 OK\r\n\r\n");
        let error = response_decoder().decode(&mut buf).unwrap_err();
        assert!(matches!(error, ParseError::InvalidStatus));
    }

    #[test]
    fn rejected_status_line_has_no_progress() {
        let mut decoder = response_decoder();
        let mut buf = BytesMut::from("HTTP/1.1 2000 OK\r\n\r\n");

        let error = decoder.decode(&mut buf).unwrap_err();

        assert!(matches!(error, ParseError::InvalidStatus));
        assert_eq!(decoder.progress().status_code, None);
    }

    #[test]
    fn invalid_method_without_space() {
        let mut buf = BytesMut::from("\x01".repeat(4096).as_str());

        let error = request_decoder().decode(&mut buf).unwrap_err();

        let ParseError::InvalidMethod { token } = error else {
            panic!("expected an invalid method, got {error:?}");
        };
        assert_eq!(token.len(), crate::protocol::MAX_METHOD_TOKEN_LEN);
    }
}
