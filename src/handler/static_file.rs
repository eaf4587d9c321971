//! Static file transfer.

use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::mime::ContentTypes;
use crate::http::response::{DEFAULT_CONTENT_TYPE, ResponseHeader};
use crate::http::writer::write_text;

/// Sends `path` with a 200 header.
///
/// The content type comes from the file's extension, falling back to
/// `text/plain`. If the file cannot be opened any more (it was removed or
/// changed after classification) the client gets the header with an empty
/// body.
pub async fn serve_file<W>(
    out: &mut W,
    path: &Path,
    types: &ContentTypes,
    head: bool,
) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let content_type = types.for_path(path).unwrap_or(DEFAULT_CONTENT_TYPE);
    write_text(out, &ResponseHeader::ok(content_type), None).await?;

    if head {
        return Ok(());
    }

    let mut file = match File::open(path).await {
        Ok(file) => file,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "File vanished before it could be sent");
            return Ok(());
        }
    };

    let sent = tokio::io::copy(&mut file, out).await?;
    out.flush().await?;
    tracing::debug!(path = %path.display(), bytes = sent, "File sent");

    Ok(())
}
