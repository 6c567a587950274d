pub mod cli;
pub mod logging;
pub mod proxy;
pub mod settings;

use std::sync::Arc;

use anyhow::Result;

use crate::proxy::cache::ObjectCache;
use crate::settings::Settings;

pub async fn run(settings: Settings) -> Result<()> {
    let settings = Arc::new(settings);
    let cache = Arc::new(ObjectCache::new(
        settings.cache_max_object_size,
        settings.cache_total_capacity,
    ));
    let app = proxy::AppContext::new(settings, cache);
    proxy::run(app).await
}
