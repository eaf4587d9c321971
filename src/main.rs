use std::sync::Arc;

use anyhow::Context;
use wsng::config::{self, Config};
use wsng::handler::Dispatcher;
use wsng::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let config_path = config::config_path_from_args(std::env::args().skip(1))?;
    let cfg = Config::load(&config_path)?;

    std::env::set_current_dir(&cfg.server_root).with_context(|| {
        format!("cannot change to rootdir {}", cfg.server_root.display())
    })?;

    if cfg.content_types.is_empty() {
        tracing::warn!("No content types configured, every file is served as text/plain");
    }

    let dispatcher = Arc::new(Dispatcher::new(".", cfg.content_types.clone())?);
    let listener = server::bind(&cfg.listen_addr()).await?;

    tracing::info!(
        root = %dispatcher.root().display(),
        types = dispatcher.content_types().len(),
        "wsng{} started",
        wsng::http::response::SERVER_VERSION
    );

    server::serve(listener, dispatcher, shutdown_signal()).await
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
                return;
            }
            Err(e) => tracing::warn!("Cannot watch SIGTERM: {}", e),
        }
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot watch SIGINT: {}", e);
        std::future::pending::<()>().await;
    }
}
