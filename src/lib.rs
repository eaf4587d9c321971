//! wsng - a small HTTP/1.0 origin server
//!
//! Serves static files, directory listings and CGI programs from one root
//! directory, one worker per connection.

pub mod config;
pub mod handler;
pub mod http;
pub mod server;
