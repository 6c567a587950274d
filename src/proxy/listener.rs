use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use super::{AppContext, http};

/// Accept loop. Each accepted connection gets a detached task that serves
/// exactly one request; the loop never joins or counts its workers.
pub async fn start_listener(app: AppContext) -> Result<()> {
    let bind_addr = app.settings.listen;
    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind listener on {bind_addr}"))?;
    let local_addr = listener.local_addr().unwrap_or(bind_addr);
    info!(address = %local_addr, "proxy listener started");

    loop {
        let (stream, peer_addr) = match listener.accept().await {
            Ok(pair) => pair,
            Err(err) => {
                warn!(error = %err, "failed to accept incoming connection");
                continue;
            }
        };
        debug!(peer = %peer_addr, "accepted connection");
        let connection_app = app.clone();
        tokio::spawn(async move {
            if let Err(err) = http::serve_connection(stream, peer_addr, connection_app).await {
                debug!(peer = %peer_addr, error = %err, "connection closed with error");
            }
        });
    }
}
