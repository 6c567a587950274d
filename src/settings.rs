use std::net::{Ipv4Addr, SocketAddr};

use crate::proxy::cache::{MAX_CACHE_SIZE, MAX_OBJECT_SIZE};

const DEFAULT_MAX_HEADER_BLOCK_SIZE: usize = 32 * 1024;
const DEFAULT_MAX_LINE_SIZE: usize = 8 * 1024;

/// Runtime configuration. The sizes are fixed policy, not user-tunable:
/// [`Settings::new`] fills them from the compiled-in caps and the only
/// external input is the listening port. Fields stay public so tests can
/// shrink the budgets.
#[derive(Debug, Clone)]
pub struct Settings {
    pub listen: SocketAddr,
    /// Total byte budget shared by all cached objects.
    pub cache_total_capacity: usize,
    /// Largest single response the cache will accept.
    pub cache_max_object_size: usize,
    /// Cap on the accumulated pass-through header block.
    pub max_header_block_size: usize,
    /// Cap on any single request or header line; longer lines are truncated.
    pub max_line_size: usize,
}

impl Settings {
    pub fn new(port: u16) -> Self {
        Self {
            listen: SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)),
            cache_total_capacity: MAX_CACHE_SIZE,
            cache_max_object_size: MAX_OBJECT_SIZE,
            max_header_block_size: DEFAULT_MAX_HEADER_BLOCK_SIZE,
            max_line_size: DEFAULT_MAX_LINE_SIZE,
        }
    }
}
