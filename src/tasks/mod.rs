//! Background Tasks Module
//!
//! Contains background tasks that run alongside the cache.
//!
//! # Tasks
//! - TTL Cleanup: Purges expired local entries at configured intervals

mod cleanup;

pub use cleanup::spawn_cleanup_task;
