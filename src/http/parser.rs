use crate::http::path::{self, ROOT};
use crate::http::request::{Method, Request};

#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    /// Nothing but whitespace on the line
    Empty,
    /// Fewer than the two tokens `METHOD TARGET`
    MissingTarget,
}

/// Parses one request line such as `GET /foo/bar.html HTTP/1.0`.
///
/// The method and target are the first two whitespace separated tokens;
/// anything after them (usually the protocol version) is ignored. The
/// target is sanitized and its query string split off before it is stored
/// in [`Request::path`].
///
/// An unknown verb is not an error here. It parses to [`Method::Other`] so
/// the caller can reply 501 instead of 400.
pub fn parse_request_line(line: &str) -> Result<Request, ParseError> {
    let mut parts = line.split_whitespace();

    let method_str = parts.next().ok_or(ParseError::Empty)?;
    let target = parts.next().ok_or(ParseError::MissingTarget)?;

    let sanitized = path::sanitize(target);
    let (clean, query) = path::split_query(&sanitized);
    let clean = if clean.is_empty() { ROOT } else { clean };

    Ok(Request {
        method: Method::from(method_str),
        raw_target: target.to_string(),
        path: clean.to_string(),
        query: query.map(str::to_string),
    })
}
