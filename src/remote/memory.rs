//! In-process remote tier.
//!
//! Behaves like a shared key/value service: entries expire, lookups are
//! counted as hits or misses, and the service can be switched offline to
//! exercise degraded paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;

use super::{glob_match, RemoteStats, RemoteStore};
use crate::error::{RemoteError, RemoteResult};

#[derive(Debug)]
struct StoredValue {
    value: String,
    expires_at: Instant,
}

impl StoredValue {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Remote tier kept in process memory.
///
/// Share one instance between several managers (via `Arc`) to model a
/// service visible to multiple cache instances.
#[derive(Debug)]
pub struct MemoryRemote {
    entries: Mutex<HashMap<String, StoredValue>>,
    hits: AtomicU64,
    misses: AtomicU64,
    available: AtomicBool,
}

impl Default for MemoryRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            available: AtomicBool::new(true),
        }
    }

    /// Switches the service on or off. While off, every call fails with
    /// [`RemoteError::Unavailable`].
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    /// Raw stored text for a key, bypassing availability and counters.
    pub fn peek(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        self.entries
            .lock()
            .get(key)
            .filter(|stored| stored.is_live(now))
            .map(|stored| stored.value.clone())
    }

    fn ensure_available(&self) -> RemoteResult<()> {
        if self.is_available() {
            Ok(())
        } else {
            Err(RemoteError::Unavailable("memory remote switched off".to_string()))
        }
    }
}

#[async_trait]
impl RemoteStore for MemoryRemote {
    async fn get(&self, key: &str) -> RemoteResult<Option<String>> {
        self.ensure_available()?;
        let value = self.peek(key);
        if value.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> RemoteResult<()> {
        self.ensure_available()?;
        self.entries.lock().insert(
            key.to_string(),
            StoredValue {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> RemoteResult<u64> {
        self.ensure_available()?;
        let now = Instant::now();
        let removed = self.entries.lock().remove(key);
        Ok(removed.map_or(0, |stored| u64::from(stored.is_live(now))))
    }

    async fn scan(&self, pattern: &str) -> RemoteResult<Vec<String>> {
        self.ensure_available()?;
        let now = Instant::now();
        let mut keys: Vec<String> = self
            .entries
            .lock()
            .iter()
            .filter(|(key, stored)| stored.is_live(now) && glob_match(pattern, key))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn delete_many(&self, keys: &[String]) -> RemoteResult<u64> {
        self.ensure_available()?;
        let now = Instant::now();
        let mut entries = self.entries.lock();
        let removed = keys
            .iter()
            .filter_map(|key| entries.remove(key))
            .filter(|stored| stored.is_live(now))
            .count();
        Ok(removed as u64)
    }

    async fn stats(&self) -> RemoteResult<RemoteStats> {
        self.ensure_available()?;
        let now = Instant::now();
        let key_count = self
            .entries
            .lock()
            .values()
            .filter(|stored| stored.is_live(now))
            .count() as u64;
        Ok(RemoteStats {
            key_count,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        })
    }
}
