use std::fmt;

/// HTTP request methods.
///
/// Only GET and HEAD are served. Anything else is kept verbatim so the
/// dispatcher can answer it with 501 Not Implemented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// Any other verb, exactly as the client sent it
    Other(String),
}

/// A request line after parsing.
///
/// `raw_target` is the target exactly as received; `path` is the sanitized
/// form with any query string removed and `query` holds what followed the
/// last `?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The HTTP method (GET, HEAD, or something unsupported)
    pub method: Method,
    /// The request target as sent by the client (e.g. "/docs/../index.html?x=1")
    pub raw_target: String,
    /// Sanitized path relative to the server root (e.g. "index.html")
    pub path: String,
    /// Query string without the leading `?`
    pub query: Option<String>,
}

impl Method {
    /// Whether the server knows how to answer this method.
    pub fn is_supported(&self) -> bool {
        matches!(self, Method::GET | Method::HEAD)
    }

    /// The verb as it appears on the wire.
    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::Other(s) => s,
        }
    }
}

/// Parses an HTTP method from a string.
///
/// Matching is case-sensitive: `get` is not `GET`.
///
/// # Example
///
/// ```
/// # use wsng::http::request::Method;
/// assert_eq!(Method::from("GET"), Method::GET);
/// assert_eq!(Method::from("get"), Method::Other("get".to_string()));
/// ```
impl From<&str> for Method {
    fn from(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "HEAD" => Method::HEAD,
            other => Method::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Request {
    /// True when the response body must be left out.
    pub fn is_head(&self) -> bool {
        self.method == Method::HEAD
    }
}
