mod index;

use bytes::Bytes;
use parking_lot::Mutex;
use tracing::trace;

use index::CacheIndex;

/// Total byte budget shared by all cached objects.
pub const MAX_CACHE_SIZE: usize = 1_049_000;
/// Largest single response the cache will hold.
pub const MAX_OBJECT_SIZE: usize = 102_400;

/// Process-wide response cache: byte-bounded, strict LRU by last access
/// (read or write).
///
/// Every public operation takes the one internal lock for its full duration
/// and performs no I/O under it. Reads hand back a freshly allocated copy,
/// so callers can write to sockets after the lock is gone.
pub struct ObjectCache {
    index: Mutex<CacheIndex>,
    max_object_bytes: usize,
}

impl ObjectCache {
    pub fn new(max_object_bytes: usize, max_total_bytes: usize) -> Self {
        Self {
            index: Mutex::new(CacheIndex::new(max_total_bytes)),
            max_object_bytes,
        }
    }

    /// Copy-on-read lookup. A hit promotes the entry to most recently used.
    pub fn get(&self, key: &str) -> Option<Bytes> {
        let mut guard = self.index.lock();
        let entry = guard.get(key)?;
        let copy = Bytes::copy_from_slice(entry);
        trace!(key, bytes = copy.len(), "cache hit");
        Some(copy)
    }

    /// Store a response under `key`, displacing any existing entry for the
    /// same key and evicting from the LRU tail until the byte budget holds.
    /// Empty and oversized objects are ignored.
    pub fn insert(&self, key: &str, data: &[u8]) {
        if data.is_empty() || data.len() > self.max_object_bytes {
            trace!(key, bytes = data.len(), "object not cacheable");
            return;
        }
        let mut guard = self.index.lock();
        guard.insert(key, data);
    }

    pub fn bytes_in_use(&self) -> usize {
        self.index.lock().bytes_in_use()
    }

    pub fn len(&self) -> usize {
        self.index.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
