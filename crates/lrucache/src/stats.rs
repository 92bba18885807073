//! Lookup and put counters for an LRU cache

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::lru::PutOutcome;

/// Running counters fed by cache lookups and put outcomes
///
/// Counters are relaxed atomics, so one tracker can be shared by threads
/// that serialize the cache itself elsewhere.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
    updates: AtomicU64,
    evictions: AtomicU64,
}

/// Point-in-time copy of [`CacheStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Lookups that found their key
    pub hits: u64,
    /// Lookups that did not
    pub misses: u64,
    /// Puts that added a new key
    pub inserts: u64,
    /// Puts that overwrote a resident key
    pub updates: u64,
    /// Entries pushed out by inserts into a full cache
    pub evictions: u64,
}

impl StatsSnapshot {
    /// Fraction of lookups that hit, 0.0 when nothing was looked up
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "hits:      {}", self.hits)?;
        writeln!(f, "misses:    {}", self.misses)?;
        writeln!(f, "hit ratio: {:.2}", self.hit_ratio())?;
        writeln!(f, "inserts:   {}", self.inserts)?;
        writeln!(f, "updates:   {}", self.updates)?;
        write!(f, "evictions: {}", self.evictions)
    }
}

impl CacheStats {
    /// Create a tracker with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a lookup, returning it unchanged
    ///
    /// ```
    /// use lrucache::{CacheStats, LruCache};
    ///
    /// let stats = CacheStats::new();
    /// let mut cache = LruCache::new(2)?;
    /// cache.put("a", 1);
    ///
    /// assert_eq!(stats.record_lookup(cache.get(&"a")), Some(&1));
    /// assert_eq!(stats.record_lookup(cache.get(&"b")), None);
    /// assert_eq!(stats.snapshot().hits, 1);
    /// # Ok::<(), lrucache::Error>(())
    /// ```
    pub fn record_lookup<T>(&self, found: Option<T>) -> Option<T> {
        let counter = if found.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    /// Count what a put did to the cache
    pub fn record_put<K>(&self, outcome: &PutOutcome<K>) {
        match outcome {
            PutOutcome::Updated => {
                self.updates.fetch_add(1, Ordering::Relaxed);
            }
            PutOutcome::Inserted => {
                self.inserts.fetch_add(1, Ordering::Relaxed);
            }
            PutOutcome::Evicted(_) => {
                self.inserts.fetch_add(1, Ordering::Relaxed);
                self.evictions.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Copy all counters out
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            updates: self.updates.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    /// Zero every counter
    pub fn reset(&self) {
        for counter in [
            &self.hits,
            &self.misses,
            &self.inserts,
            &self.updates,
            &self.evictions,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}
