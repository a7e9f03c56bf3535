//! HTTP request method codes.
//!
//! Every method the parser recognises has a stable small-integer code. The
//! order of the table is fixed, so codes can be stored or compared without
//! depending on the string form.

use std::fmt;

/// Returned by [`method_str`] when no method has been recognised.
pub const UNKNOWN_METHOD: &str = "<unknown>";

macro_rules! http_methods {
    ($($variant:ident = $code:literal => $token:literal,)+) => {
        /// A request method recognised by the parser, encoded as a stable `u8` code.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum HttpMethod {
            $(
                #[doc = concat!("`", $token, "`")]
                $variant = $code,
            )+
        }

        const METHODS: &[HttpMethod] = &[$(HttpMethod::$variant,)+];

        impl HttpMethod {
            /// Returns the canonical upper-case token, e.g. `"GET"`.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(HttpMethod::$variant => $token,)+
                }
            }

            /// Looks up a method by its exact token. Matching is case-sensitive.
            #[must_use]
            pub fn from_bytes(token: &[u8]) -> Option<Self> {
                $(
                    if token == $token.as_bytes() {
                        return Some(HttpMethod::$variant);
                    }
                )+
                None
            }
        }
    };
}

http_methods! {
    Delete = 0 => "DELETE",
    Get = 1 => "GET",
    Head = 2 => "HEAD",
    Post = 3 => "POST",
    Put = 4 => "PUT",
    Connect = 5 => "CONNECT",
    Options = 6 => "OPTIONS",
    Trace = 7 => "TRACE",
    Copy = 8 => "COPY",
    Lock = 9 => "LOCK",
    Mkcol = 10 => "MKCOL",
    Move = 11 => "MOVE",
    Propfind = 12 => "PROPFIND",
    Proppatch = 13 => "PROPPATCH",
    Search = 14 => "SEARCH",
    Unlock = 15 => "UNLOCK",
    Bind = 16 => "BIND",
    Rebind = 17 => "REBIND",
    Unbind = 18 => "UNBIND",
    Acl = 19 => "ACL",
    Report = 20 => "REPORT",
    Mkactivity = 21 => "MKACTIVITY",
    Checkout = 22 => "CHECKOUT",
    Merge = 23 => "MERGE",
    MSearch = 24 => "M-SEARCH",
    Notify = 25 => "NOTIFY",
    Subscribe = 26 => "SUBSCRIBE",
    Unsubscribe = 27 => "UNSUBSCRIBE",
    Patch = 28 => "PATCH",
    Purge = 29 => "PURGE",
    Mkcalendar = 30 => "MKCALENDAR",
    Link = 31 => "LINK",
    Unlink = 32 => "UNLINK",
    Source = 33 => "SOURCE",
}

impl HttpMethod {
    /// Every recognised method, ordered by code.
    pub const ALL: &'static [HttpMethod] = METHODS;

    /// Returns the stable numeric code of this method.
    #[inline]
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Looks up a method by its numeric code.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        METHODS.get(usize::from(code)).copied()
    }

    /// Whether a request with this method tunnels the connection after its head.
    #[inline]
    #[must_use]
    pub fn is_connect(self) -> bool {
        self == HttpMethod::Connect
    }
}

/// Maps an optional method to its token, or [`UNKNOWN_METHOD`].
#[inline]
#[must_use]
pub fn method_str(method: Option<HttpMethod>) -> &'static str {
    method.map_or(UNKNOWN_METHOD, HttpMethod::as_str)
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for http::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Delete => http::Method::DELETE,
            HttpMethod::Get => http::Method::GET,
            HttpMethod::Head => http::Method::HEAD,
            HttpMethod::Post => http::Method::POST,
            HttpMethod::Put => http::Method::PUT,
            HttpMethod::Connect => http::Method::CONNECT,
            HttpMethod::Options => http::Method::OPTIONS,
            HttpMethod::Trace => http::Method::TRACE,
            HttpMethod::Patch => http::Method::PATCH,
            // every token in the table is a valid RFC 9110 token
            other => http::Method::from_bytes(other.as_str().as_bytes()).unwrap_or_default(),
        }
    }
}
