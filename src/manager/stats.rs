//! Cache Statistics Module
//!
//! Snapshot of both tiers returned by `CacheManager::get_stats`.

use serde::Serialize;

use crate::remote::RemoteStats;

// == Cache Stats ==
/// Statistics across both tiers.
///
/// The remote fields are only present when the remote tier is connected
/// and answered the stats request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Whether a remote tier was connected at construction
    pub remote_available: bool,
    /// Live entries in the local tier
    pub local_size: usize,
    /// Maximum entries in the local tier
    pub local_capacity: usize,
    /// Keys stored in the remote tier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_key_count: Option<u64>,
    /// Remote lookups that found a key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_hits: Option<u64>,
    /// Remote lookups that found nothing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_misses: Option<u64>,
}

impl CacheStats {
    /// Creates stats for the local tier only.
    pub fn local(remote_available: bool, local_size: usize, local_capacity: usize) -> Self {
        Self {
            remote_available,
            local_size,
            local_capacity,
            remote_key_count: None,
            remote_hits: None,
            remote_misses: None,
        }
    }

    /// Fills in the remote counters.
    pub fn with_remote(mut self, remote: RemoteStats) -> Self {
        self.remote_key_count = Some(remote.key_count);
        self.remote_hits = Some(remote.hits);
        self.remote_misses = Some(remote.misses);
        self
    }

    /// Remote hit rate, None without remote counters or lookups.
    pub fn remote_hit_rate(&self) -> Option<f64> {
        let hits = self.remote_hits?;
        let total = hits + self.remote_misses?;
        if total == 0 {
            None
        } else {
            Some(hits as f64 / total as f64)
        }
    }
}
