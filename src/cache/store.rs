//! TTL Cache Module
//!
//! Bounded local tier combining HashMap storage with FIFO eviction and TTL expiration.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::trace;

use crate::cache::{CacheEntry, FifoTracker};

#[derive(Debug)]
struct Inner<V> {
    entries: HashMap<String, CacheEntry<V>>,
    order: FifoTracker,
}

impl<V> Inner<V> {
    fn remove(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let removed = self.entries.remove(key);
        if removed.is_some() {
            self.order.remove(key);
        }
        removed
    }

    fn purge_expired(&mut self) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.remove(key);
        }
        expired.len()
    }
}

// == TTL Cache ==
/// Fixed-capacity key/value store where every entry expires after a TTL.
///
/// When a new key is inserted into a full cache, expired entries are dropped
/// first; if the cache is still full, the oldest-inserted entry is evicted.
/// Eviction is FIFO: neither reads nor overwrites change a key's position.
///
/// All state sits behind one mutex, so the cache can be shared across
/// threads and tasks without external locking. No method can fail.
#[derive(Debug)]
pub struct TtlCache<V> {
    inner: Mutex<Inner<V>>,
    capacity: usize,
    ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    // == Constructor ==
    /// Creates a cache holding at most `capacity` entries (minimum 1),
    /// each living for `ttl` unless written with an explicit TTL.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::with_capacity(capacity),
                order: FifoTracker::new(),
            }),
            capacity,
            ttl,
        }
    }

    // == Get ==
    /// Returns a clone of the value, or None if absent or expired.
    ///
    /// Expired entries found here are removed.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut inner = self.inner.lock();
        let expired = match inner.entries.get(key) {
            Some(entry) if !entry.is_expired() => return Some(entry.value.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            trace!(key, "local entry expired");
            inner.remove(key);
        }
        None
    }

    // == Set ==
    /// Inserts or overwrites a value using the cache's configured TTL.
    pub fn set(&self, key: &str, value: V) {
        self.set_with_ttl(key, value, self.ttl);
    }

    /// Inserts or overwrites a value with an explicit TTL.
    ///
    /// Overwriting a live entry resets the expiry clock and keeps its
    /// insertion position. Writing over an expired entry counts as a fresh
    /// insert. Inserting a new key into a full cache evicts exactly one live
    /// entry at most.
    pub fn set_with_ttl(&self, key: &str, value: V, ttl: Duration) {
        let mut inner = self.inner.lock();
        let entry = CacheEntry::new(value, ttl);

        match inner.entries.get(key).map(|existing| existing.is_expired()) {
            Some(false) => {
                inner.entries.insert(key.to_string(), entry);
                return;
            }
            Some(true) => {
                inner.remove(key);
            }
            None => {}
        }

        if inner.entries.len() >= self.capacity {
            let purged = inner.purge_expired();
            if purged > 0 {
                trace!(purged, "dropped expired entries before insert");
            }
        }
        if inner.entries.len() >= self.capacity {
            if let Some(evicted) = inner.order.evict_oldest() {
                inner.entries.remove(&evicted);
                trace!(key = %evicted, "evicted oldest local entry");
            }
        }

        inner.entries.insert(key.to_string(), entry);
        inner.order.push(key);
    }

    // == Delete ==
    /// Removes an entry. Returns true if a live entry was removed.
    pub fn delete(&self, key: &str) -> bool {
        let mut inner = self.inner.lock();
        inner
            .remove(key)
            .map(|entry| !entry.is_expired())
            .unwrap_or(false)
    }

    // == Size ==
    /// Number of live entries. Expired entries are purged first.
    pub fn size(&self) -> usize {
        let mut inner = self.inner.lock();
        inner.purge_expired();
        inner.entries.len()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// TTL applied by [`TtlCache::set`].
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Purge Expired ==
    /// Removes all expired entries, returning how many were dropped.
    pub fn purge_expired(&self) -> usize {
        self.inner.lock().purge_expired()
    }

    /// Removes every entry.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.order.clear();
    }
}
