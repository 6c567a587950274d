use std::net::SocketAddr;

use anyhow::Result;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

pub struct ProxyClient {
    stream: TcpStream,
}

impl ProxyClient {
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        Ok(Self {
            stream: TcpStream::connect(addr).await?,
        })
    }

    pub async fn send(&mut self, request: impl AsRef<[u8]>) -> Result<()> {
        self.stream.write_all(request.as_ref()).await?;
        self.stream.flush().await?;
        Ok(())
    }

    /// Collect the response until the proxy closes the connection — the only
    /// way it ever terminates a response.
    pub async fn read_response(&mut self) -> Result<String> {
        let mut collected = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let read = self.stream.read(&mut chunk).await?;
            if read == 0 {
                break;
            }
            collected.extend_from_slice(&chunk[..read]);
        }
        Ok(String::from_utf8_lossy(&collected).into_owned())
    }

    /// Convenience round trip: connect, send, read to EOF.
    pub async fn fetch(addr: SocketAddr, request: impl AsRef<[u8]>) -> Result<String> {
        let mut client = Self::connect(addr).await?;
        client.send(request).await?;
        client.read_response().await
    }
}
