use std::time::SystemTime;

use crate::http::time;

/// Name sent in the `Server` header.
pub const SERVER_NAME: &str = "WSNG";
/// Version sent in the `Server` header.
pub const SERVER_VERSION: &str = "1";
/// Content type for static files whose extension has no mapping.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// HTTP status codes supported by the server.
///
/// - `Ok` (200): Request successful
/// - `BadRequest` (400): Malformed request line
/// - `Forbidden` (403): Target exists but may not be read
/// - `NotFound` (404): Target does not exist
/// - `NotImplemented` (501): Method other than GET or HEAD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 501 Not Implemented
    NotImplemented,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use wsng::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotImplemented.as_u16(), 501);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::NotImplemented => 501,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use wsng::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::NotImplemented => "Not Implemented",
        }
    }
}

/// The head of a response: status line plus the fixed header set.
///
/// A header without a content type is what CGI programs get; they finish
/// the header block themselves.
#[derive(Debug, Clone)]
pub struct ResponseHeader {
    /// The HTTP status code
    pub status: StatusCode,
    /// Value of the `Content-Type` header, left out when `None`
    pub content_type: Option<String>,
    /// Value of the `Date` header
    pub date: String,
    /// Value of the `Server` header
    pub server: String,
}

/// Builder for response headers in a fluent style.
///
/// # Example
///
/// ```ignore
/// let header = ResponseHeaderBuilder::new(StatusCode::Ok)
///     .content_type("text/html")
///     .build();
/// ```
pub struct ResponseHeaderBuilder {
    status: StatusCode,
    content_type: Option<String>,
    date: Option<SystemTime>,
}

impl ResponseHeaderBuilder {
    /// Creates a new header builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            content_type: None,
            date: None,
        }
    }

    /// Sets the `Content-Type` header.
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Pins the `Date` header instead of using the current time.
    pub fn date(mut self, at: SystemTime) -> Self {
        self.date = Some(at);
        self
    }

    pub fn build(self) -> ResponseHeader {
        let at = self.date.unwrap_or_else(SystemTime::now);

        ResponseHeader {
            status: self.status,
            content_type: self.content_type,
            date: time::http_date(at),
            server: format!("{}/{}", SERVER_NAME, SERVER_VERSION),
        }
    }
}

impl ResponseHeader {
    /// 200 with the given content type.
    pub fn ok(content_type: impl Into<String>) -> Self {
        ResponseHeaderBuilder::new(StatusCode::Ok)
            .content_type(content_type)
            .build()
    }

    /// 200 with no content type, for CGI output.
    pub fn ok_untyped() -> Self {
        ResponseHeaderBuilder::new(StatusCode::Ok).build()
    }

    /// Plain-text header used by every error page.
    pub fn plain(status: StatusCode) -> Self {
        ResponseHeaderBuilder::new(status)
            .content_type("text/plain")
            .build()
    }
}
