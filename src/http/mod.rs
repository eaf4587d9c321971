//! HTTP/1.0 protocol pieces.
//!
//! - **`connection`**: one worker per accepted socket: read, dispatch, flush
//! - **`parser`**: the request line into a [`request::Request`]
//! - **`path`**: target sanitizing and query splitting
//! - **`request`** / **`response`**: request and response header types
//! - **`writer`**: response header serialization
//! - **`mime`**: extension to content type table
//! - **`time`**: header and listing date formats
//!
//! # Connection lifecycle
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← request line, then header block (discarded)
//!        └──────┬──────┘
//!               ▼
//!        ┌──────────────────┐
//!        │   Dispatching    │ ← write the response
//!        └──────┬───────────┘
//!               ├─ CGI → Executing (program writes the rest)
//!               └─ otherwise → Closed
//! ```
//!
//! There is no keep-alive: every connection carries exactly one request.

pub mod connection;
pub mod mime;
pub mod parser;
pub mod path;
pub mod request;
pub mod response;
pub mod time;
pub mod writer;
