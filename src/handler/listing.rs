//! HTML directory listings.
//!
//! A listing is a bare `<table>` with one row per directory entry: a link to
//! the entry, its modification time and its size. Rows come out in whatever
//! order the filesystem yields them.

use std::fs::Metadata;
use std::path::Path;
use std::time::UNIX_EPOCH;

use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::ResponseHeader;
use crate::http::time::table_date;
use crate::http::writer::write_text;

const TABLE_HEADER: &str =
    "<table>\n<tbody>\n<tr><th>Name</th><th>Last Modified</th><th>Size</th></tr>\n";
const TABLE_CLOSE: &str = "</tbody></table>\n";

/// One rendered line of the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryRow {
    pub name: String,
    pub is_dir: bool,
    pub mtime_display: String,
    pub size_bytes: u64,
}

impl DirectoryRow {
    pub fn from_metadata(name: impl Into<String>, meta: &Metadata) -> Self {
        let modified = meta.modified().unwrap_or(UNIX_EPOCH);
        Self {
            name: name.into(),
            is_dir: meta.is_dir(),
            mtime_display: table_date(modified),
            size_bytes: meta.len(),
        }
    }

    /// The `<tr>` for this entry. Directories get a trailing `/` in both the
    /// link and the label.
    pub fn render(&self) -> String {
        let slash = if self.is_dir { "/" } else { "" };
        let name = escape_html(&self.name);
        format!(
            "<tr><td><a href='{name}{slash}'>{name}{slash}</a></td><td>{}</td><td>{}</td></tr>\n",
            self.mtime_display, self.size_bytes
        )
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

/// 200 `text/html` header followed by the listing of `dir`.
pub async fn serve_listing<W>(out: &mut W, dir: &Path, head: bool) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    write_text(out, &ResponseHeader::ok("text/html"), None).await?;
    if head {
        return Ok(());
    }
    list(dir, out).await
}

/// Writes the table for `dir`.
///
/// The header has already gone out by the time this runs, so a directory
/// that cannot be opened is only logged. Entries whose metadata cannot be
/// read are skipped.
pub async fn list<W>(dir: &Path, out: &mut W) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::error!(dir = %dir.display(), error = %e, "Couldn't open directory");
            return Ok(());
        }
    };

    let mut buf = BytesMut::new();
    buf.put_slice(TABLE_HEADER.as_bytes());

    // read_dir never yields these two
    for special in [".", ".."] {
        if let Some(row) = row_for(dir, special).await {
            buf.put_slice(row.render().as_bytes());
        }
    }

    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "Directory read interrupted");
                break;
            }
        };

        let name = entry.file_name().to_string_lossy().into_owned();
        if let Some(row) = row_for(dir, &name).await {
            buf.put_slice(row.render().as_bytes());
        }
    }

    buf.put_slice(TABLE_CLOSE.as_bytes());
    out.write_all(&buf).await?;
    Ok(())
}

async fn row_for(dir: &Path, name: &str) -> Option<DirectoryRow> {
    let path = dir.join(name);
    match tokio::fs::symlink_metadata(&path).await {
        Ok(meta) => Some(DirectoryRow::from_metadata(name, &meta)),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Skipping entry");
            None
        }
    }
}
