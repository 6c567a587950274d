use bytes::Bytes;
use lru::LruCache;

/// Recency-ordered store behind the [`super::ObjectCache`] lock. The LRU
/// structure carries no entry-count bound; eviction is driven entirely by
/// the byte budget.
pub(super) struct CacheIndex {
    lru: LruCache<String, Bytes>,
    bytes_in_use: usize,
    max_bytes: usize,
}

impl CacheIndex {
    pub(super) fn new(max_bytes: usize) -> Self {
        Self {
            lru: LruCache::unbounded(),
            bytes_in_use: 0,
            max_bytes,
        }
    }

    pub(super) fn get(&mut self, key: &str) -> Option<&Bytes> {
        self.lru.get(key)
    }

    pub(super) fn insert(&mut self, key: &str, data: &[u8]) {
        if let Some(removed) = self.lru.pop(key) {
            self.bytes_in_use = self.bytes_in_use.saturating_sub(removed.len());
        }

        while self.bytes_in_use + data.len() > self.max_bytes {
            match self.lru.pop_lru() {
                Some((_key, removed)) => {
                    self.bytes_in_use = self.bytes_in_use.saturating_sub(removed.len());
                }
                None => break,
            }
        }

        // The eviction loop drained the cache and the object still does not
        // fit: give up rather than blow the budget.
        if self.bytes_in_use + data.len() > self.max_bytes {
            return;
        }

        self.lru.push(key.to_string(), Bytes::copy_from_slice(data));
        self.bytes_in_use += data.len();
    }

    pub(super) fn bytes_in_use(&self) -> usize {
        self.bytes_in_use
    }

    pub(super) fn len(&self) -> usize {
        self.lru.len()
    }
}
