use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use crate::handler::{CgiInvocation, Dispatcher, Outcome};

/// Longest request line kept; the rest of the line is read and dropped.
pub const MAX_REQUEST_LINE: usize = 4096;

/// One accepted client, served exactly once.
pub struct Connection {
    stream: BufReader<TcpStream>,
    dispatcher: Arc<Dispatcher>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Dispatching(String),
    Executing(CgiInvocation),
    Closed,
}

impl Connection {
    pub fn new(stream: TcpStream, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            stream: BufReader::new(stream),
            dispatcher,
            state: ConnectionState::Reading,
        }
    }

    /// Reads the request line and its header block, answers it, and returns
    /// once the response has been flushed or the CGI program has exited.
    pub async fn run(mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => match read_request(&mut self.stream).await? {
                    Some(line) => {
                        tracing::info!(request = line.trim_end(), "Got a call");
                        self.state = ConnectionState::Dispatching(line);
                    }
                    None => {
                        tracing::debug!("Client closed before sending a request");
                    }
                },

                ConnectionState::Dispatching(line) => {
                    let out = self.stream.get_mut();
                    let outcome = self.dispatcher.dispatch(&line, out).await?;
                    out.flush().await?;

                    if let Outcome::Exec(invocation) = outcome {
                        self.state = ConnectionState::Executing(invocation);
                    }
                }

                ConnectionState::Executing(invocation) => {
                    // The program owns the socket from here on.
                    return invocation.run_on(self.stream.into_inner()).await;
                }

                ConnectionState::Closed => break,
            }
        }

        Ok(())
    }
}

/// Reads the request line, then discards header lines up to and including
/// the first empty one.
///
/// Returns `None` when the client closes before sending anything.
pub async fn read_request<R>(reader: &mut R) -> anyhow::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let Some(line) = read_line_capped(reader, MAX_REQUEST_LINE).await? else {
        return Ok(None);
    };
    let line = String::from_utf8_lossy(&line).into_owned();

    while let Some(header) = read_line_capped(reader, MAX_REQUEST_LINE).await? {
        if header == b"\r\n" || header == b"\n" {
            break;
        }
    }

    Ok(Some(line))
}

/// Reads through the next `\n`, keeping at most `cap` bytes of it.
///
/// The newline itself is kept when it fits. Returns `None` at EOF with
/// nothing read.
async fn read_line_capped<R>(reader: &mut R, cap: usize) -> anyhow::Result<Option<Vec<u8>>>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = Vec::new();
    let mut seen_any = false;

    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(seen_any.then_some(line));
        }
        seen_any = true;

        let (chunk, done) = match available.iter().position(|&b| b == b'\n') {
            Some(idx) => (&available[..=idx], true),
            None => (available, false),
        };

        let room = cap.saturating_sub(line.len());
        line.extend_from_slice(&chunk[..chunk.len().min(room)]);
        let consumed = chunk.len();
        reader.consume(consumed);

        if done {
            return Ok(Some(line));
        }
    }
}
