//! HTTP server lifecycle.
//!
//! [`AssetServer`] binds the configured address, opens the asset library and
//! serves the application router on a background task until it is shut down
//! or dropped.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::files::AssetLibrary;
use crate::router::app_router;

/// A running AssetView HTTP server.
pub struct AssetServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl AssetServer {
    /// Open the library, bind the listener and start serving.
    ///
    /// Binding port 0 picks a free port; use [`AssetServer::addr`] to find it.
    pub async fn start(config: &Config) -> Result<Self> {
        let library = AssetLibrary::from_config(&config.assets).with_context(|| {
            format!("Failed to open asset root: {}", config.assets.root.display())
        })?;
        let root = library.root().to_path_buf();
        let app = app_router(library, &config.server);

        let listener = TcpListener::bind(config.server.bind)
            .await
            .with_context(|| format!("Failed to bind {}", config.server.bind))?;
        let addr = listener
            .local_addr()
            .context("Failed to read listener address")?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server stopped with an error");
            }
        });

        tracing::info!(
            addr = %addr,
            root = %root.display(),
            ui_dir = %config.server.ui_dir.display(),
            "AssetView server listening"
        );

        Ok(Self {
            addr,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        })
    }

    /// The address the server is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Ask the server to stop accepting connections.
    ///
    /// In-flight requests are allowed to finish. Calling this more than once
    /// is a no-op.
    pub fn shutdown(&mut self) {
        if let Some(sender) = self.shutdown.take() {
            tracing::info!("Shutting down HTTP server");
            let _ = sender.send(());
        }
    }

    /// Shut down and wait for the serve task to finish.
    pub async fn stop(mut self) -> Result<()> {
        self.shutdown();
        if let Some(task) = self.task.take() {
            task.await.context("HTTP server task panicked")?;
        }
        Ok(())
    }
}

impl Drop for AssetServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
