//! LRU (Least Recently Used) cache implementation
//!
//! Entries live in an arena of nodes linked into a doubly-linked recency
//! list. Slots 0 and 1 are the front and back sentinels; they never hold an
//! entry, so linking and unlinking never special-case the list edges. The
//! index maps each key to the slot of its node.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use ahash::RandomState;
use tracing::{debug, trace};

use crate::error::{Error, Result};

/// Slot of the front sentinel; its `next` is the most-recently-used entry
const FRONT: usize = 0;

/// Slot of the back sentinel; its `prev` is the least-recently-used entry
const BACK: usize = 1;

/// Most entry slots reserved up front; larger caches grow on demand
const MAX_PREALLOC: usize = 4096;

/// Node in the recency list
struct Node<K, V> {
    /// `None` for the sentinels and for slots on the free list
    entry: Option<(K, V)>,
    prev: usize,
    next: usize,
}

impl<K, V> Node<K, V> {
    fn sentinel() -> Self {
        Self {
            entry: None,
            prev: FRONT,
            next: BACK,
        }
    }
}

/// What a single put did to the cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutOutcome<K> {
    /// Key was resident; value replaced and entry promoted
    Updated,
    /// Key was new and fit without eviction
    Inserted,
    /// Key was new and the carried key was evicted to make room
    Evicted(K),
}

/// Fixed-capacity LRU cache
///
/// `get` and `put` are O(1). Inserting a new key into a full cache evicts
/// the least-recently-used entry. Both a successful `get` and any `put`
/// count as a use.
///
/// The cache is not internally synchronized. Callers sharing it across
/// threads must serialize access themselves, e.g. through
/// [`SharedLruCache`](crate::SharedLruCache).
pub struct LruCache<K, V> {
    map: HashMap<K, usize, RandomState>,
    nodes: Vec<Node<K, V>>,
    free_list: Vec<usize>,
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new LRU cache holding at most `capacity` entries
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of resident entries
    ///
    /// # Returns
    /// * `Result<LruCache>` - `Error::InvalidArgument` if `capacity` is 0
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidArgument(
                "capacity must be greater than 0".to_string(),
            ));
        }

        // `capacity` entries plus one transient slot for the insert that
        // precedes an eviction; the arena never grows past that plus the
        // two sentinels.
        let reserve = capacity.saturating_add(1).min(MAX_PREALLOC);
        let mut nodes = Vec::with_capacity(reserve + 2);
        nodes.push(Node::sentinel());
        nodes.push(Node::sentinel());

        debug!(capacity, reserve, "created lru cache");

        Ok(Self {
            map: HashMap::with_capacity_and_hasher(reserve, RandomState::new()),
            nodes,
            free_list: Vec::new(),
            capacity,
        })
    }

    /// Get a value from the cache, marking it most-recently-used
    ///
    /// A miss returns `None` and leaves the cache untouched.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let idx = *self.map.get(key)?;
        self.move_to_front(idx);
        self.nodes[idx].entry.as_ref().map(|(_, value)| value)
    }

    /// Insert or overwrite a key-value pair, marking it most-recently-used
    ///
    /// Overwriting a resident key never evicts. Inserting a new key into a
    /// full cache evicts exactly one entry, the least-recently-used one.
    pub fn put(&mut self, key: K, value: V) {
        self.upsert(key, value);
    }

    /// Same as [`put`](Self::put), reporting whether the key was inserted,
    /// updated, or pushed another key out
    pub fn upsert(&mut self, key: K, value: V) -> PutOutcome<K> {
        if let Some(&idx) = self.map.get(&key) {
            if let Some((_, slot)) = &mut self.nodes[idx].entry {
                *slot = value;
            }
            self.move_to_front(idx);
            return PutOutcome::Updated;
        }

        let idx = self.alloc_node(key.clone(), value);
        self.link_front(idx);
        self.map.insert(key, idx);

        if self.map.len() > self.capacity {
            if let Some((evicted, _)) = self.evict() {
                return PutOutcome::Evicted(evicted);
            }
        }

        PutOutcome::Inserted
    }

    /// Check whether a key is resident without touching its recency
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Get the current number of entries
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Get the maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Validate the index/list invariants, panicking on the first violation
    #[doc(hidden)]
    pub fn debug_validate_invariants(&self) {
        assert!(self.map.len() <= self.capacity, "len exceeds capacity");
        assert!(self.nodes[FRONT].entry.is_none(), "front sentinel holds an entry");
        assert!(self.nodes[BACK].entry.is_none(), "back sentinel holds an entry");

        let mut count = 0;
        let mut prev = FRONT;
        let mut cursor = self.nodes[FRONT].next;
        while cursor != BACK {
            let node = &self.nodes[cursor];
            assert_eq!(node.prev, prev, "broken prev link at slot {}", cursor);

            let (key, _) = node
                .entry
                .as_ref()
                .unwrap_or_else(|| panic!("empty slot {} linked into list", cursor));
            assert_eq!(
                self.map.get(key),
                Some(&cursor),
                "index does not point at slot {}",
                cursor
            );

            count += 1;
            assert!(count <= self.map.len(), "list is longer than the index");
            prev = cursor;
            cursor = node.next;
        }
        assert_eq!(self.nodes[BACK].prev, prev, "back sentinel prev link is stale");
        assert_eq!(count, self.map.len(), "list and index disagree on size");

        for &idx in &self.free_list {
            assert!(self.nodes[idx].entry.is_none(), "free slot {} still holds an entry", idx);
        }
    }

    fn move_to_front(&mut self, idx: usize) {
        trace!(slot = idx, "promote to front");
        self.unlink(idx);
        self.link_front(idx);
    }

    fn link_front(&mut self, idx: usize) {
        let first = self.nodes[FRONT].next;
        self.nodes[idx].prev = FRONT;
        self.nodes[idx].next = first;
        self.nodes[first].prev = idx;
        self.nodes[FRONT].next = idx;
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
    }

    fn evict(&mut self) -> Option<(K, V)> {
        let idx = self.nodes[BACK].prev;
        if idx == FRONT {
            return None;
        }

        self.unlink(idx);
        let (key, value) = self.nodes[idx].entry.take()?;
        self.map.remove(&key);
        self.free_node(idx);

        debug!(slot = idx, len = self.map.len(), "evicted least-recently-used entry");
        Some((key, value))
    }

    fn alloc_node(&mut self, key: K, value: V) -> usize {
        if let Some(idx) = self.free_list.pop() {
            self.nodes[idx].entry = Some((key, value));
            idx
        } else {
            let idx = self.nodes.len();
            self.nodes.push(Node {
                entry: Some((key, value)),
                prev: FRONT,
                next: BACK,
            });
            idx
        }
    }

    fn free_node(&mut self, idx: usize) {
        self.nodes[idx].prev = idx;
        self.nodes[idx].next = idx;
        self.free_list.push(idx);
    }
}

impl<K, V> LruCache<K, V> {
    /// Iterate entries from most- to least-recently-used
    ///
    /// Iteration is observational: it never changes recency order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: &self.nodes,
            cursor: self.nodes[FRONT].next,
            remaining: self.map.len(),
        }
    }

    /// Iterate keys from most- to least-recently-used
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(key, _)| key)
    }
}

/// Iterator over cache entries, most-recently-used first
pub struct Iter<'a, K, V> {
    nodes: &'a [Node<K, V>],
    cursor: usize,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == BACK {
            return None;
        }

        let nodes = self.nodes;
        let node = &nodes[self.cursor];
        self.cursor = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        node.entry.as_ref().map(|(key, value)| (key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K, V> IntoIterator for &'a LruCache<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Renders `LruCache{k1:v1, k2:v2}`, most-recently-used first
impl<K: fmt::Display, V: fmt::Display> fmt::Display for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LruCache{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}:{}", key, value)?;
        }
        f.write_str("}")
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .field("entries", &DebugEntries(self))
            .finish()
    }
}

struct DebugEntries<'a, K, V>(&'a LruCache<K, V>);

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for DebugEntries<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys_of<K: Clone, V>(cache: &LruCache<K, V>) -> Vec<K> {
        cache.keys().cloned().collect()
    }

    #[test]
    fn test_lru_zero_capacity() {
        let result = LruCache::<u32, u32>::new(0);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_lru_basic() {
        let mut cache = LruCache::new(2).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");

        assert_eq!(cache.get(&1), Some(&"a"));
        assert_eq!(cache.get(&2), Some(&"b"));
        assert_eq!(cache.len(), 2);
        cache.debug_validate_invariants();
    }

    #[test]
    fn test_lru_eviction() {
        let mut cache = LruCache::new(2).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");
        cache.put(3, "c"); // Should evict 1

        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), Some(&"b"));
        assert_eq!(cache.get(&3), Some(&"c"));
        cache.debug_validate_invariants();
    }

    #[test]
    fn test_lru_get_promotes() {
        let mut cache = LruCache::new(2).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");
        cache.get(&1); // Move 1 to front
        cache.put(3, "c"); // Should evict 2

        assert_eq!(cache.get(&1), Some(&"a"));
        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.get(&3), Some(&"c"));
    }

    #[test]
    fn test_lru_overwrite() {
        let mut cache = LruCache::new(2).unwrap();

        cache.put(1, "a");
        cache.put(1, "b"); // Overwrite

        assert_eq!(cache.get(&1), Some(&"b"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_lru_overwrite_at_capacity_keeps_all() {
        let mut cache = LruCache::new(2).unwrap();

        cache.put(1, 10);
        cache.put(2, 20);
        assert_eq!(cache.upsert(1, 11), PutOutcome::Updated);

        assert_eq!(cache.len(), 2);
        assert_eq!(keys_of(&cache), vec![1, 2]);
        assert_eq!(cache.get(&2), Some(&20));
    }

    #[test]
    fn test_lru_overwrite_promotes() {
        let mut cache = LruCache::new(2).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");
        cache.put(1, "z");
        cache.put(3, "c"); // 2 is now least recently used

        assert!(!cache.contains(&2));
        assert_eq!(keys_of(&cache), vec![3, 1]);
    }

    #[test]
    fn test_lru_scenario() {
        let mut cache = LruCache::new(2).unwrap();

        cache.put(1, 1);
        assert_eq!(cache.to_string(), "LruCache{1:1}");

        cache.put(2, 2);
        assert_eq!(cache.to_string(), "LruCache{2:2, 1:1}");

        assert_eq!(cache.get(&1), Some(&1));
        assert_eq!(cache.to_string(), "LruCache{1:1, 2:2}");

        cache.put(3, 3);
        assert_eq!(cache.to_string(), "LruCache{3:3, 1:1}");

        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.to_string(), "LruCache{3:3, 1:1}");
    }

    #[test]
    fn test_lru_get_front_is_stable() {
        let mut cache = LruCache::new(3).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");
        cache.put(3, "c");

        assert_eq!(cache.get(&3), Some(&"c"));
        assert_eq!(cache.get(&3), Some(&"c"));
        assert_eq!(keys_of(&cache), vec![3, 2, 1]);
        cache.debug_validate_invariants();
    }

    #[test]
    fn test_lru_miss_does_not_reorder() {
        let mut cache = LruCache::new(3).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");
        assert_eq!(cache.get(&9), None);

        assert_eq!(keys_of(&cache), vec![2, 1]);
    }

    #[test]
    fn test_lru_iter_does_not_promote() {
        let mut cache = LruCache::new(2).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");

        let seen: Vec<_> = cache.iter().collect();
        assert_eq!(seen, vec![(&2, &"b"), (&1, &"a")]);
        assert_eq!(cache.iter().len(), 2);
        assert!(cache.contains(&1));

        cache.put(3, "c"); // 1 is still least recently used
        assert!(!cache.contains(&1));
    }

    #[test]
    fn test_lru_capacity_one() {
        let mut cache = LruCache::new(1).unwrap();

        cache.put("x", 1);
        cache.put("y", 2);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&"x"), None);
        assert_eq!(cache.get(&"y"), Some(&2));
        cache.debug_validate_invariants();
    }

    #[test]
    fn test_lru_reports_evicted_key() {
        let mut cache = LruCache::new(2).unwrap();

        assert_eq!(cache.upsert(1, ()), PutOutcome::Inserted);
        assert_eq!(cache.upsert(2, ()), PutOutcome::Inserted);
        assert_eq!(cache.upsert(3, ()), PutOutcome::Evicted(1));
    }

    #[test]
    fn test_lru_reuses_evicted_slots() {
        let mut cache = LruCache::new(4).unwrap();

        for i in 0..1000 {
            cache.put(i, i * 2);
        }

        assert_eq!(cache.len(), 4);
        assert!(cache.nodes.len() <= cache.capacity() + 3);
        assert_eq!(keys_of(&cache), vec![999, 998, 997, 996]);
        cache.debug_validate_invariants();
    }

    #[test]
    fn test_lru_huge_capacity() {
        let mut cache = LruCache::<u64, u64>::new(usize::MAX).unwrap();

        for i in 0..10 {
            cache.put(i, i);
        }

        assert_eq!(cache.len(), 10);
        assert_eq!(cache.capacity(), usize::MAX);
        assert_eq!(cache.get(&0), Some(&0));
        cache.debug_validate_invariants();

        let cache = LruCache::<u64, u64>::new(1 << 40).unwrap();
        assert!(cache.nodes.capacity() <= MAX_PREALLOC + 2);
    }

    #[test]
    fn test_lru_grows_past_prealloc() {
        let mut cache = LruCache::new(MAX_PREALLOC * 2).unwrap();

        for i in 0..MAX_PREALLOC * 3 {
            cache.put(i, ());
        }

        assert_eq!(cache.len(), MAX_PREALLOC * 2);
        assert!(cache.nodes.len() <= cache.capacity() + 3);
        assert!(!cache.contains(&(MAX_PREALLOC - 1)));
        assert!(cache.contains(&MAX_PREALLOC));
        cache.debug_validate_invariants();
    }

    #[test]
    fn test_lru_empty_display() {
        let cache = LruCache::<u8, u8>::new(3).unwrap();

        assert!(cache.is_empty());
        assert_eq!(cache.to_string(), "LruCache{}");
        assert_eq!(cache.iter().next(), None);
    }

    #[test]
    fn test_lru_debug_format() {
        let mut cache = LruCache::new(2).unwrap();
        cache.put("k", 1);

        assert_eq!(
            format!("{:?}", cache),
            r#"LruCache { capacity: 2, entries: {"k": 1} }"#
        );
    }
}
