//! API server lifecycle.

use std::fmt::Display;
use std::future::Future;
use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// HTTP server for the price API.
pub struct ApiServer {
    port: u16,
    router: Router,
    cancel: CancellationToken,
}

impl ApiServer {
    /// Create a new API server.
    #[must_use]
    pub const fn new(port: u16, router: Router, cancel: CancellationToken) -> Self {
        Self {
            port,
            router,
            cancel,
        }
    }

    /// Run the API server until cancelled.
    ///
    /// # Errors
    ///
    /// Returns `ApiServerError` if binding fails or the server stops with
    /// an I/O error.
    pub async fn run(self) -> Result<(), ApiServerError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ApiServerError::BindFailed(self.port, e.to_string()))?;

        tracing::info!(port = self.port, "Price API listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(self.cancel.cancelled_owned())
            .await
            .map_err(|e| ApiServerError::ServerFailed(e.to_string()))?;

        tracing::info!("Price API stopped");
        Ok(())
    }
}

/// API server errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiServerError {
    /// Failed to bind to port.
    #[error("failed to bind to port {0}: {1}")]
    BindFailed(u16, String),

    /// Server error.
    #[error("server error: {0}")]
    ServerFailed(String),
}

/// Run a server on its own task. If it returns an error, the error is logged
/// and `shutdown` is cancelled so the sibling servers stop too.
pub fn spawn_server<F, E>(
    name: &'static str,
    server: F,
    shutdown: CancellationToken,
) -> (&'static str, JoinHandle<()>)
where
    F: Future<Output = Result<(), E>> + Send + 'static,
    E: Display + Send + 'static,
{
    let handle = tokio::spawn(async move {
        if let Err(e) = server.await {
            tracing::error!(server = name, error = %e, "Server failed");
            shutdown.cancel();
        }
    });
    (name, handle)
}

/// Wait for every server task and log those that panicked or were aborted.
///
/// Returns the number of tasks that did not finish cleanly.
pub async fn join_servers(tasks: Vec<(&'static str, JoinHandle<()>)>) -> usize {
    let mut failed = 0;
    for (name, handle) in tasks {
        if let Err(e) = handle.await {
            tracing::error!(server = name, error = %e, "Server task did not finish cleanly");
            failed += 1;
        }
    }
    failed
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn bind_failure_cancels_shutdown() {
        let taken = TcpListener::bind("0.0.0.0:0").await.unwrap();
        let port = taken.local_addr().unwrap().port();
        let shutdown = CancellationToken::new();

        let server = ApiServer::new(port, Router::new(), shutdown.clone());
        let task = spawn_server("api", server.run(), shutdown.clone());

        tokio::time::timeout(Duration::from_secs(5), shutdown.cancelled())
            .await
            .unwrap();
        assert_eq!(join_servers(vec![task]).await, 0);
    }

    #[tokio::test]
    async fn clean_exit_leaves_shutdown_alone() {
        let shutdown = CancellationToken::new();
        let task = spawn_server("noop", async { Ok::<(), String>(()) }, shutdown.clone());

        assert_eq!(join_servers(vec![task]).await, 0);
        assert!(!shutdown.is_cancelled());
    }

    #[tokio::test]
    async fn panicked_task_is_counted() {
        let ok = spawn_server("ok", async { Ok::<(), String>(()) }, CancellationToken::new());
        let panicked: JoinHandle<()> = tokio::spawn(async { panic!("handler bug") });

        assert_eq!(join_servers(vec![ok, ("health", panicked)]).await, 1);
    }
}
