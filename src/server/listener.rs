use std::future::Future;
use std::io;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tracing::info;

use crate::handler::Dispatcher;
use crate::http::connection::Connection;

pub async fn bind(addr: &str) -> anyhow::Result<TcpListener> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Cannot bind {}", addr))?;
    info!("Listening on {}", listener.local_addr()?);
    Ok(listener)
}

/// Accepts connections until `shutdown` resolves.
///
/// Every connection is served by its own task. Finished tasks are reaped
/// without ever holding up `accept`. When `shutdown` fires the listener is
/// closed; workers still running are not cancelled, and this returns once
/// the last of them has finished.
pub async fn serve<F>(
    listener: TcpListener,
    dispatcher: Arc<Dispatcher>,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()>,
{
    let mut workers = JoinSet::new();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown signal received, closing listener");
                break;
            }

            Some(result) = workers.join_next(), if !workers.is_empty() => {
                reap(result);
            }

            accepted = listener.accept() => {
                let (socket, peer) = match accepted {
                    Ok(accepted) => accepted,
                    Err(e) if is_transient(&e) => {
                        tracing::warn!(error = %e, "Accept interrupted, retrying");
                        continue;
                    }
                    Err(e) => return Err(e).context("accept failed"),
                };
                info!("Accepted connection from {}", peer);

                let dispatcher = Arc::clone(&dispatcher);
                workers.spawn(async move {
                    let conn = Connection::new(socket, dispatcher);
                    if let Err(e) = conn.run().await {
                        tracing::error!("Connection error from {}: {:#}", peer, e);
                    }
                });

                while let Some(result) = workers.try_join_next() {
                    reap(result);
                }
            }
        }
    }

    drop(listener);

    if !workers.is_empty() {
        info!(in_flight = workers.len(), "Waiting for running workers");
    }
    while let Some(result) = workers.join_next().await {
        reap(result);
    }

    Ok(())
}

fn reap(result: Result<(), tokio::task::JoinError>) {
    match result {
        Ok(()) => tracing::debug!("Worker reaped"),
        Err(e) if e.is_panic() => tracing::error!("Worker panicked: {}", e),
        Err(e) => tracing::debug!("Worker cancelled: {}", e),
    }
}

/// Errors from `accept` that concern one pending connection, not the
/// listener.
fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::Interrupted
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::WouldBlock
    )
}
