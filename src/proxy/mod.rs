pub mod cache;
pub mod http;
pub mod listener;
pub mod request;

use std::sync::Arc;

use anyhow::Result;

use crate::settings::Settings;
use cache::ObjectCache;

/// Shared handles passed to every worker. The cache is the only piece of
/// shared mutable state in the process.
#[derive(Clone)]
pub struct AppContext {
    pub settings: Arc<Settings>,
    pub cache: Arc<ObjectCache>,
}

impl AppContext {
    pub fn new(settings: Arc<Settings>, cache: Arc<ObjectCache>) -> Self {
        Self { settings, cache }
    }
}

pub async fn run(app: AppContext) -> Result<()> {
    listener::start_listener(app).await
}
