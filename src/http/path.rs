//! Request target hardening.
//!
//! Targets are turned into paths relative to the server root. This is a
//! best-effort filter over strings: it removes parent-directory segments but
//! does not decode percent escapes or look at symlinks.

/// Segment that names the server root once everything else is gone.
pub const ROOT: &str = ".";

/// Removes every `..` segment from `raw`.
///
/// The input is split on `/` and empty segments are dropped, so leading,
/// trailing and doubled slashes disappear. Each `..` is discarded along with
/// the closest kept segment before it, if there is one. An empty result
/// becomes `.`.
///
/// ```
/// # use wsng::http::path::sanitize;
/// assert_eq!(sanitize("/"), ".");
/// assert_eq!(sanitize("/a/../b"), "b");
/// assert_eq!(sanitize("/../../etc/passwd"), "etc/passwd");
/// ```
pub fn sanitize(raw: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();

    for segment in raw.split('/') {
        match segment {
            "" => {}
            ".." => {
                kept.pop();
            }
            other => kept.push(other),
        }
    }

    if kept.is_empty() {
        ROOT.to_string()
    } else {
        kept.join("/")
    }
}

/// Splits a path at its last `?`.
///
/// Returns the part before it and, if a `?` was present, everything after
/// it. No decoding is done on either half.
pub fn split_query(path: &str) -> (&str, Option<&str>) {
    match path.rfind('?') {
        Some(idx) => (&path[..idx], Some(&path[idx + 1..])),
        None => (path, None),
    }
}
