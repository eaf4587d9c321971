use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::ResponseHeader;

const HTTP_VERSION: &str = "HTTP/1.0";

/// Serializes the status line and headers.
///
/// The blank line that ends the header block is not included: handlers add
/// it before their body, and CGI programs write their own.
pub fn serialize_header(header: &ResponseHeader) -> BytesMut {
    let mut buf = BytesMut::with_capacity(128);

    // Status line
    buf.put_slice(
        format!(
            "{} {} {}\r\n",
            HTTP_VERSION,
            header.status.as_u16(),
            header.status.reason_phrase()
        )
        .as_bytes(),
    );

    put_header(&mut buf, "Date", &header.date);
    put_header(&mut buf, "Server", &header.server);
    if let Some(content_type) = &header.content_type {
        put_header(&mut buf, "Content-Type", content_type);
    }

    buf
}

fn put_header(buf: &mut BytesMut, key: &str, value: &str) {
    buf.put_slice(key.as_bytes());
    buf.put_slice(b": ");
    buf.put_slice(value.as_bytes());
    buf.put_slice(b"\r\n");
}

pub async fn write_header<W>(out: &mut W, header: &ResponseHeader) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    out.write_all(&serialize_header(header)).await?;
    Ok(())
}

/// Writes a complete header block followed by a short text body.
pub async fn write_text<W>(
    out: &mut W,
    header: &ResponseHeader,
    body: Option<&str>,
) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut buf = serialize_header(header);
    buf.put_slice(b"\r\n");
    if let Some(body) = body {
        buf.put_slice(body.as_bytes());
    }
    out.write_all(&buf).await?;
    Ok(())
}
