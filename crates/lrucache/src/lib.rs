//! # lrucache
//!
//! Fixed-capacity in-memory cache with least-recently-used eviction.
//!
//! ## Architecture
//! - **Index**: AHash map from key to arena slot (O(1) lookup)
//! - **Recency List**: sentinel-bounded doubly-linked list over the arena
//!   (O(1) promote, insert and evict)
//! - **SharedLruCache**: single-mutex wrapper with hit/miss statistics for
//!   hosts that share a cache between threads
//!
//! ```
//! use lrucache::LruCache;
//!
//! let mut cache = LruCache::new(2)?;
//! cache.put(1, 1);
//! cache.put(2, 2);
//! assert_eq!(cache.get(&1), Some(&1));
//! cache.put(3, 3); // evicts 2
//! assert_eq!(cache.get(&2), None);
//! assert_eq!(cache.to_string(), "LruCache{3:3, 1:1}");
//! # Ok::<(), lrucache::Error>(())
//! ```

#![warn(missing_docs)]

mod error;
mod lru;
mod shared;
mod stats;

pub use error::{Error, Result};
pub use lru::{Iter, LruCache, PutOutcome};
pub use shared::SharedLruCache;
pub use stats::{CacheStats, StatsSnapshot};
