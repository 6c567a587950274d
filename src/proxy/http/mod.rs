pub(crate) mod codec;
mod forward;

use std::net::SocketAddr;

use anyhow::Result;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::debug;

use super::AppContext;
use super::request::{self, RequestError};
use codec::read_request_head;

/// One request/response cycle. The connection closes when this returns,
/// on success and on every failure path alike; rejected requests get no
/// response bytes at all.
pub(crate) async fn serve_connection(
    stream: TcpStream,
    peer: SocketAddr,
    app: AppContext,
) -> Result<()> {
    let mut reader = BufReader::new(stream);
    let head = read_request_head(
        &mut reader,
        app.settings.max_line_size,
        app.settings.max_header_block_size,
    )
    .await?;
    let Some(head) = head else {
        debug!(peer = %peer, "connection closed before request line");
        return Ok(());
    };

    let mut parsed = request::parse_target(&head.target);
    if parsed.hostname.is_empty()
        && let Some(host) = head.headers.host()
    {
        request::apply_host_fallback(&mut parsed, host);
    }
    if parsed.hostname.is_empty() {
        return Err(RequestError::MissingHost.into());
    }

    let key = parsed.cache_key();
    if let Some(cached) = app.cache.get(&key) {
        debug!(peer = %peer, key, bytes = cached.len(), "serving response from cache");
        let stream = reader.get_mut();
        stream.write_all(&cached).await?;
        stream.flush().await?;
        return Ok(());
    }

    forward::forward_to_origin(
        reader.get_mut(),
        &parsed,
        head.headers.extra_headers(),
        &key,
        &app,
    )
    .await
}
