//! SharedLruCache: mutex-guarded LRU cache for multi-threaded hosts

use std::hash::Hash;

use parking_lot::Mutex;

use crate::error::Result;
use crate::lru::{LruCache, PutOutcome};
use crate::stats::CacheStats;

/// LRU cache that can be shared across threads
///
/// Every operation holds one lock over the whole cache, so the index and
/// recency list are always updated together. Wrap in an `Arc` to share.
pub struct SharedLruCache<K, V> {
    cache: Mutex<LruCache<K, V>>,
    stats: CacheStats,
}

impl<K, V> SharedLruCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Create a new shared cache with the given capacity
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of resident entries
    ///
    /// # Returns
    /// * `Result<SharedLruCache>` - `Error::InvalidArgument` if `capacity` is 0
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self {
            cache: Mutex::new(LruCache::new(capacity)?),
            stats: CacheStats::new(),
        })
    }

    /// Get a clone of a cached value, marking it most-recently-used
    pub fn get(&self, key: &K) -> Option<V> {
        let mut cache = self.cache.lock();
        self.stats.record_lookup(cache.get(key).cloned())
    }

    /// Insert or overwrite a value, evicting the least-recently-used entry
    /// if a new key overflows the cache
    pub fn put(&self, key: K, value: V) -> PutOutcome<K> {
        let outcome = self.cache.lock().upsert(key, value);
        self.stats.record_put(&outcome);
        outcome
    }

    /// Check whether a key is resident without touching its recency
    pub fn contains(&self, key: &K) -> bool {
        self.cache.lock().contains(key)
    }

    /// Copy out all entries, most-recently-used first
    pub fn snapshot(&self) -> Vec<(K, V)> {
        self.cache
            .lock()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Get current number of entries
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.cache.lock().capacity()
    }
}
