//! Date strings for headers and listings.

use std::time::SystemTime;

use chrono::{DateTime, Local, Utc};

/// RFC 1123 date for the `Date` header, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
pub fn http_date(at: SystemTime) -> String {
    DateTime::<Utc>::from(at)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Local time for the directory listing, e.g. `01-May-2019 19:18`.
pub fn table_date(at: SystemTime) -> String {
    DateTime::<Local>::from(at).format("%d-%b-%Y %H:%M").to_string()
}
