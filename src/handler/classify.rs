//! Filesystem classification of a sanitized request path.

use std::fs::Metadata;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

const OWNER_READ: u32 = 0o400;
const OWNER_EXEC: u32 = 0o100;

/// What a sanitized path points at, in routing priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsEntryKind {
    /// Nothing there, or the lookup failed for any reason
    Missing,
    /// Present but lacking the owner permission bits needed to serve it
    Forbidden,
    Directory,
    /// A file whose final extension is `cgi`
    CgiExecutable,
    RegularFile,
}

/// True when the last extension of `path` is exactly `cgi`.
pub fn is_cgi(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "cgi")
}

/// Classifies `path`.
///
/// Every request is re-stated; nothing is cached. Lookup errors of any kind
/// count as [`FsEntryKind::Missing`].
pub async fn classify(path: &Path) -> FsEntryKind {
    match tokio::fs::metadata(path).await {
        Ok(meta) => classify_metadata(path, &meta),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Stat failed");
            FsEntryKind::Missing
        }
    }
}

fn classify_metadata(path: &Path, meta: &Metadata) -> FsEntryKind {
    let cgi = is_cgi(path);
    let mut required = OWNER_READ;
    if meta.is_dir() || cgi {
        required |= OWNER_EXEC;
    }

    if meta.permissions().mode() & required != required {
        FsEntryKind::Forbidden
    } else if meta.is_dir() {
        FsEntryKind::Directory
    } else if cgi {
        FsEntryKind::CgiExecutable
    } else {
        FsEntryKind::RegularFile
    }
}
