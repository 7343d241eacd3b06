//! Shared helpers for tests across the workspace.

use anyhow::Context as _;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::Child;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub struct KillOnDrop(pub Child);

impl Drop for KillOnDrop {
    fn drop(&mut self) {
        let _ = self.0.kill();
    }
}

/// An in-process HTTP backend bound to an ephemeral localhost port.
///
/// Dropping it signals shutdown without waiting; call [`MockBackend::stop`] to wait for the
/// server task to finish.
pub struct MockBackend {
    /// `http://127.0.0.1:<port>`, no trailing slash.
    pub base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<std::io::Result<()>>>,
}

impl MockBackend {
    /// Serve `app` until stopped. Handlers may extract `ConnectInfo<SocketAddr>`.
    ///
    /// # Errors
    ///
    /// Returns an error if binding an ephemeral localhost port fails.
    pub async fn start(app: axum::Router) -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .context("bind ephemeral port")?;
        let addr = listener.local_addr().context("local_addr")?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server = axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        });
        let handle = tokio::spawn(async move { server.await });

        Ok(Self {
            base_url: format!("http://{addr}"),
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Signal shutdown and wait for in-flight requests to complete.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Write `document` as pretty JSON to `<dir>/openapi.json`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_document(dir: &Path, document: &serde_json::Value) -> anyhow::Result<PathBuf> {
    let path = dir.join("openapi.json");
    let text = serde_json::to_string_pretty(document).context("serialize document")?;
    std::fs::write(&path, text).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}
