//! Fixed plain-text replies for requests that are not served.

use tokio::io::AsyncWrite;

use crate::http::response::{ResponseHeader, StatusCode};
use crate::http::writer::write_text;

pub async fn bad_request<W: AsyncWrite + Unpin>(out: &mut W) -> anyhow::Result<()> {
    write_text(
        out,
        &ResponseHeader::plain(StatusCode::BadRequest),
        Some("I cannot understand your request\r\n"),
    )
    .await
}

pub async fn not_implemented<W: AsyncWrite + Unpin>(out: &mut W) -> anyhow::Result<()> {
    write_text(
        out,
        &ResponseHeader::plain(StatusCode::NotImplemented),
        Some("That command is not yet implemented\r\n"),
    )
    .await
}

pub async fn not_found<W: AsyncWrite + Unpin>(
    out: &mut W,
    item: &str,
    head: bool,
) -> anyhow::Result<()> {
    let body = format!("The item you requested: {}\r\nis not found\r\n", item);
    write_text(
        out,
        &ResponseHeader::plain(StatusCode::NotFound),
        (!head).then_some(body.as_str()),
    )
    .await
}

pub async fn forbidden<W: AsyncWrite + Unpin>(
    out: &mut W,
    item: &str,
    head: bool,
) -> anyhow::Result<()> {
    let body = format!(
        "You do not have permission to access {} on this server\r\n",
        item
    );
    write_text(
        out,
        &ResponseHeader::plain(StatusCode::Forbidden),
        (!head).then_some(body.as_str()),
    )
    .await
}
