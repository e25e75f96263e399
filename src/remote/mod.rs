//! Remote Tier Module
//!
//! Interface to a shared key/value service with expiring entries.
//!
//! The cache manager treats every call here as a network suspension point
//! that may fail independently; implementations own their timeouts.

mod memory;
mod pattern;
#[cfg(feature = "redis")]
mod redis;

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::RemoteResult;

pub use memory::MemoryRemote;
pub use pattern::glob_match;
#[cfg(feature = "redis")]
pub use self::redis::RedisStore;

// == Remote Stats ==
/// Counters reported by the remote service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RemoteStats {
    /// Number of keys currently stored
    pub key_count: u64,
    /// Lookups that found a key
    pub hits: u64,
    /// Lookups that found nothing
    pub misses: u64,
}

// == Remote Store Trait ==
/// Shared key/value service used as the remote tier.
///
/// Values are the JSON text produced by the cache manager.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch a value, None if the key is absent or expired
    async fn get(&self, key: &str) -> RemoteResult<Option<String>>;

    /// Store a value that expires after `ttl`
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> RemoteResult<()>;

    /// Delete a key, returning the number of keys removed
    async fn delete(&self, key: &str) -> RemoteResult<u64>;

    /// List keys matching a glob pattern (`*` and `?` wildcards)
    async fn scan(&self, pattern: &str) -> RemoteResult<Vec<String>>;

    /// Delete several keys, returning the number actually removed
    async fn delete_many(&self, keys: &[String]) -> RemoteResult<u64>;

    /// Service-wide key count and hit/miss counters
    async fn stats(&self) -> RemoteResult<RemoteStats>;
}
