//! Tiered Cache - a two-tier caching layer
//!
//! A bounded in-process cache with TTL expiration and FIFO eviction, backed
//! by an optional shared remote cache, plus memoizing wrappers that derive
//! cache keys from call arguments.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod manager;
pub mod memoize;
pub mod models;
pub mod remote;
pub mod tasks;

pub use api::AppState;
pub use cache::TtlCache;
pub use config::Config;
pub use manager::{CacheManager, CacheStats, DEFAULT_TTL};
pub use memoize::{async_cached, cached, CallArgs, MemoizeOptions};
pub use remote::{MemoryRemote, RemoteStore};
pub use tasks::spawn_cleanup_task;
