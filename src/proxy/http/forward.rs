use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

use crate::proxy::AppContext;
use crate::proxy::request::ParsedRequest;

/// Fixed identity presented to every origin, replacing whatever the client sent.
const USER_AGENT_LINE: &[u8] =
    b"User-Agent: Mozilla/5.0 (X11; Linux x86_64; rv:10.0.3) Gecko/20120305 Firefox/10.0.3\r\n";

const RELAY_CHUNK_SIZE: usize = 8192;

/// Assemble the rewritten HTTP/1.0 request in a single buffer.
pub(crate) fn build_upstream_request(request: &ParsedRequest, extra_headers: &[u8]) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(256 + extra_headers.len());
    buffer.extend_from_slice(b"GET ");
    buffer.extend_from_slice(request.path.as_bytes());
    buffer.extend_from_slice(b" HTTP/1.0\r\n");
    buffer.extend_from_slice(b"Host: ");
    buffer.extend_from_slice(request.host_value().as_bytes());
    buffer.extend_from_slice(b"\r\n");
    buffer.extend_from_slice(USER_AGENT_LINE);
    buffer.extend_from_slice(b"Connection: close\r\n");
    buffer.extend_from_slice(b"Proxy-Connection: close\r\n");
    buffer.extend_from_slice(extra_headers);
    buffer.extend_from_slice(b"\r\n");
    buffer
}

/// Side buffer fed alongside the relay loop. Crossing the object cap marks
/// the response non-cacheable and releases the memory; forwarding is not
/// affected.
pub(crate) struct ResponseCollector {
    data: Vec<u8>,
    max_bytes: usize,
    oversized: bool,
}

impl ResponseCollector {
    pub fn new(max_bytes: usize) -> Self {
        Self {
            data: Vec::new(),
            max_bytes,
            oversized: false,
        }
    }

    pub fn push(&mut self, chunk: &[u8]) {
        if self.oversized {
            return;
        }
        if self.data.len() + chunk.len() > self.max_bytes {
            self.oversized = true;
            self.data = Vec::new();
            return;
        }
        self.data.extend_from_slice(chunk);
    }

    /// The accumulated response, if it stayed within the cap and is non-empty.
    pub fn into_cacheable(self) -> Option<Vec<u8>> {
        if self.oversized || self.data.is_empty() {
            None
        } else {
            Some(self.data)
        }
    }
}

/// Connect to the origin, send the rewritten request, and stream the
/// response back chunk by chunk. On clean EOF the accumulated bytes go into
/// the cache under `key`; any mid-transfer failure caches nothing.
pub(crate) async fn forward_to_origin<C>(
    client: &mut C,
    request: &ParsedRequest,
    extra_headers: &[u8],
    key: &str,
    app: &AppContext,
) -> Result<()>
where
    C: AsyncWrite + Unpin,
{
    let authority = format!("{}:{}", request.hostname, request.port);
    let mut upstream = TcpStream::connect(authority.as_str())
        .await
        .with_context(|| format!("failed to connect to origin {authority}"))?;

    let request_bytes = build_upstream_request(request, extra_headers);
    upstream
        .write_all(&request_bytes)
        .await
        .with_context(|| format!("sending request to origin {authority}"))?;

    let mut collector = ResponseCollector::new(app.settings.cache_max_object_size);
    let mut buffer = [0u8; RELAY_CHUNK_SIZE];
    let mut total = 0u64;
    loop {
        let read = upstream
            .read(&mut buffer)
            .await
            .with_context(|| format!("reading response from origin {authority}"))?;
        if read == 0 {
            break;
        }
        client
            .write_all(&buffer[..read])
            .await
            .context("writing response chunk to client")?;
        collector.push(&buffer[..read]);
        total += read as u64;
    }
    client.flush().await.context("flushing client stream")?;

    if let Some(response) = collector.into_cacheable() {
        let cached_bytes = response.len();
        app.cache.insert(key, &response);
        debug!(key, bytes = cached_bytes, "cached origin response");
    }
    debug!(key, bytes = total, "origin transfer complete");
    Ok(())
}
