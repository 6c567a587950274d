use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, bail};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep};

use cachepipe::{
    proxy::{self, AppContext, cache::ObjectCache},
    settings::Settings,
};

pub struct ProxyHarness {
    pub addr: SocketAddr,
    pub settings: Arc<Settings>,
    pub cache: Arc<ObjectCache>,
    handle: JoinHandle<()>,
}

impl ProxyHarness {
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }
}

pub async fn spawn_proxy() -> Result<ProxyHarness> {
    spawn_proxy_with(|_| {}).await
}

/// Start the proxy on an ephemeral loopback port, applying a settings
/// override first (used to shrink the cache budgets for eviction tests).
pub async fn spawn_proxy_with<F>(override_fn: F) -> Result<ProxyHarness>
where
    F: FnOnce(&mut Settings),
{
    let port = reserve_loopback_port()?;
    let mut settings = Settings::new(port);
    settings.listen = SocketAddr::from(([127, 0, 0, 1], port));
    override_fn(&mut settings);

    let addr = settings.listen;
    let settings = Arc::new(settings);
    let cache = Arc::new(ObjectCache::new(
        settings.cache_max_object_size,
        settings.cache_total_capacity,
    ));
    let app = AppContext::new(settings.clone(), cache.clone());

    let handle = tokio::spawn(async move {
        if let Err(err) = proxy::run(app).await {
            eprintln!("proxy run failed: {err:?}");
        }
    });
    await_accepting(addr).await?;

    Ok(ProxyHarness {
        addr,
        settings,
        cache,
        handle,
    })
}

/// Bind to port 0, note the kernel's assignment, and release it for the
/// proxy to claim.
fn reserve_loopback_port() -> Result<u16> {
    let probe = std::net::TcpListener::bind("127.0.0.1:0")?;
    Ok(probe.local_addr()?.port())
}

/// Poll until the freshly spawned listener accepts a connection.
async fn await_accepting(addr: SocketAddr) -> Result<()> {
    let deadline = Instant::now() + Duration::from_secs(3);
    while Instant::now() < deadline {
        if let Ok(probe) = TcpStream::connect(addr).await {
            drop(probe);
            return Ok(());
        }
        sleep(Duration::from_millis(25)).await;
    }
    bail!("proxy at {addr} never started accepting connections")
}
