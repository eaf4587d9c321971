//! Request dispatch.
//!
//! The dispatcher turns one request line into one response:
//!
//! ```text
//!   request line ─► parse ─► sanitize ─► split query ─► classify
//!                                                          │
//!        ┌──────────────┬──────────────┬──────────────┬────┴─────────┐
//!        ▼              ▼              ▼              ▼              ▼
//!     Missing       Forbidden      Directory    CgiExecutable   RegularFile
//!       404            403       index.html /       CGI          static
//!                                index.cgi /
//!                                  listing
//! ```
//!
//! Everything but CGI is written straight to the output. A CGI request
//! gets its 200 header written here and is handed back to the connection as
//! an [`Outcome::Exec`], because running the program needs the socket
//! itself.

pub mod cgi;
pub mod classify;
pub mod listing;
pub mod static_file;
pub mod status;

use std::path::{Path, PathBuf};

use anyhow::Context;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::mime::ContentTypes;
use crate::http::parser::parse_request_line;
use crate::http::request::Request;
use crate::http::response::ResponseHeader;
use crate::http::writer::write_header;

pub use cgi::CgiInvocation;
pub use classify::{FsEntryKind, classify};

const INDEX_HTML: &str = "index.html";
const INDEX_CGI: &str = "index.cgi";

/// What the connection still has to do after [`Dispatcher::dispatch`].
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The response is complete
    Done,
    /// The header is out; run this program on the socket
    Exec(CgiInvocation),
}

/// Routes requests against one server root. Shared read-only by every
/// connection worker.
#[derive(Debug)]
pub struct Dispatcher {
    root: PathBuf,
    types: ContentTypes,
}

impl Dispatcher {
    /// The root is made absolute up front so CGI programs can be given a
    /// working directory without changing how their path resolves.
    pub fn new(root: impl AsRef<Path>, types: ContentTypes) -> anyhow::Result<Self> {
        let root = std::path::absolute(root.as_ref())
            .with_context(|| format!("Invalid server root {}", root.as_ref().display()))?;
        Ok(Self { root, types })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn content_types(&self) -> &ContentTypes {
        &self.types
    }

    pub async fn dispatch<W>(&self, line: &str, out: &mut W) -> anyhow::Result<Outcome>
    where
        W: AsyncWrite + Unpin,
    {
        let request = match parse_request_line(line) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!(line = line.trim_end(), error = ?e, "Bad request line");
                status::bad_request(out).await?;
                return Ok(Outcome::Done);
            }
        };

        if !request.method.is_supported() {
            tracing::debug!(method = %request.method, "Unsupported method");
            status::not_implemented(out).await?;
            return Ok(Outcome::Done);
        }

        let target = self.root.join(&request.path);
        let kind = classify(&target).await;
        tracing::debug!(
            method = %request.method,
            path = %request.path,
            ?kind,
            "Routing request"
        );

        match kind {
            FsEntryKind::Missing => status::not_found(out, &request.path, request.is_head()).await?,
            FsEntryKind::Forbidden => {
                status::forbidden(out, &request.path, request.is_head()).await?
            }
            FsEntryKind::Directory => return self.serve_directory(&request, &target, out).await,
            FsEntryKind::CgiExecutable => return self.start_cgi(&request, target, out).await,
            FsEntryKind::RegularFile => {
                static_file::serve_file(out, &target, &self.types, request.is_head()).await?
            }
        }

        Ok(Outcome::Done)
    }

    /// An index file wins over a listing: `index.html` first, then
    /// `index.cgi`.
    async fn serve_directory<W>(
        &self,
        request: &Request,
        dir: &Path,
        out: &mut W,
    ) -> anyhow::Result<Outcome>
    where
        W: AsyncWrite + Unpin,
    {
        let html = dir.join(INDEX_HTML);
        if tokio::fs::metadata(&html).await.is_ok() {
            static_file::serve_file(out, &html, &self.types, request.is_head()).await?;
            return Ok(Outcome::Done);
        }

        let cgi = dir.join(INDEX_CGI);
        if tokio::fs::metadata(&cgi).await.is_ok() {
            return self.start_cgi(request, cgi, out).await;
        }

        listing::serve_listing(out, dir, request.is_head()).await?;
        Ok(Outcome::Done)
    }

    async fn start_cgi<W>(
        &self,
        request: &Request,
        program: PathBuf,
        out: &mut W,
    ) -> anyhow::Result<Outcome>
    where
        W: AsyncWrite + Unpin,
    {
        write_header(out, &ResponseHeader::ok_untyped()).await?;
        out.flush().await?;

        Ok(Outcome::Exec(CgiInvocation::new(
            program, &self.root, request,
        )))
    }
}
