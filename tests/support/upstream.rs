use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// Controlled fake origin. Serves the same canned response to every
/// connection, counts requests, and records the most recent request head so
/// tests can assert on exactly what crossed the upstream boundary.
pub struct TestUpstream {
    addr: SocketAddr,
    requests: Arc<AtomicUsize>,
    last_request: Arc<Mutex<Option<String>>>,
    handle: JoinHandle<()>,
}

impl TestUpstream {
    /// Origin answering 200 with the given body and a Content-Length header.
    pub async fn http_ok(body: &str) -> Result<Self> {
        let response = format!(
            "HTTP/1.0 200 OK\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        );
        Self::http_response(response.into_bytes()).await
    }

    /// Origin answering with an arbitrary byte stream.
    pub async fn http_response(response: impl Into<Vec<u8>>) -> Result<Self> {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
        let addr = listener.local_addr()?;
        let requests = Arc::new(AtomicUsize::new(0));
        let last_request = Arc::new(Mutex::new(None));
        let response = Arc::new(response.into());

        let accept_requests = requests.clone();
        let accept_last = last_request.clone();
        let handle = tokio::spawn(async move {
            loop {
                let (mut stream, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => break,
                };
                let requests = accept_requests.clone();
                let last_request = accept_last.clone();
                let response = response.clone();
                tokio::spawn(async move {
                    let _ = serve_one(&mut stream, &requests, &last_request, &response).await;
                });
            }
        });

        Ok(Self {
            addr,
            requests,
            last_request,
            handle,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Head of the most recent request, bytes up to and including the blank
    /// line.
    pub fn last_request_head(&self) -> Option<String> {
        self.last_request.lock().unwrap().clone()
    }
}

impl Drop for TestUpstream {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve_one(
    stream: &mut TcpStream,
    requests: &AtomicUsize,
    last_request: &Mutex<Option<String>>,
    response: &[u8],
) -> Result<()> {
    let mut head = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        let read = stream.read(&mut byte).await?;
        if read == 0 {
            break;
        }
        head.extend_from_slice(&byte);
        if head.ends_with(b"\r\n\r\n") {
            break;
        }
    }
    if head.is_empty() {
        return Ok(());
    }

    requests.fetch_add(1, Ordering::SeqCst);
    *last_request.lock().unwrap() = Some(String::from_utf8_lossy(&head).to_string());

    stream.write_all(response).await?;
    stream.shutdown().await.ok();
    Ok(())
}
