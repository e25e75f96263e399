//! Cache Module
//!
//! Provides the bounded in-process tier with TTL expiration and FIFO eviction.

mod entry;
mod fifo;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use fifo::FifoTracker;
pub use store::TtlCache;
