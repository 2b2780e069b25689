//! Keep-alive plumbing for idle-suspending hosts
//!
//! Two halves that only exist to stop the hosting platform from suspending
//! an idle process:
//! - an inbound acknowledgment endpoint: one catch-all route that accepts
//!   any request, does no work, and returns 200
//! - an outbound `ping` that GETs the deployment's own public address
//!
//! Neither half touches the retention cache.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use axum::http::StatusCode;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// How long in-flight requests get to drain during shutdown
pub const DRAIN_DEADLINE_SECS: u64 = 5;

/// Handle to the running acknowledgment endpoint
pub struct AckServer {
    /// Address the endpoint is bound to
    pub addr: SocketAddr,
    handle: JoinHandle<()>,
    shutdown_tx: oneshot::Sender<()>,
}

impl AckServer {
    /// Binds the acknowledgment endpoint and serves it on a background
    /// task. Binding failure is fatal; the caller is still starting up.
    pub async fn start(port: u16) -> Result<Self> {
        let listener = TcpListener::bind(("0.0.0.0", port))
            .await
            .with_context(|| format!("failed to bind acknowledgment endpoint on port {}", port))?;
        let addr = listener
            .local_addr()
            .context("failed to read acknowledgment endpoint address")?;

        let app = Router::new().fallback(ack);
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let shutdown = async {
                let _ = shutdown_rx.await;
            };
            if let Err(e) = axum::serve(listener, app)
                .with_graceful_shutdown(shutdown)
                .await
            {
                error!(error = %e, "Acknowledgment endpoint failed");
            }
        });

        info!(addr = %addr, "Acknowledgment endpoint listening");
        Ok(Self {
            addr,
            handle,
            shutdown_tx,
        })
    }

    /// Stops accepting new connections and waits for in-flight requests to
    /// drain, bounded by `DRAIN_DEADLINE_SECS`.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());

        match tokio::time::timeout(Duration::from_secs(DRAIN_DEADLINE_SECS), self.handle).await {
            Ok(Ok(())) => info!("Acknowledgment endpoint drained"),
            Ok(Err(e)) => error!(error = %e, "Acknowledgment endpoint task panicked"),
            Err(_) => error!(
                deadline_secs = DRAIN_DEADLINE_SECS,
                "Acknowledgment endpoint did not drain within deadline"
            ),
        }
    }
}

/// Accepts any request and does nothing
async fn ack() -> StatusCode {
    StatusCode::OK
}

/// Issues one keep-alive GET against the given URL. The response body is
/// ignored; only transport-level success matters.
pub async fn ping(client: &reqwest::Client, url: &str) -> Result<(), reqwest::Error> {
    client.get(url).send().await?.error_for_status()?;
    debug!(url = %url, "Keep-alive ping sent");
    Ok(())
}
