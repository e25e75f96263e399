//! Memoization Module
//!
//! Caches the results of expensive calls in a [`CacheManager`] under keys
//! derived from the function name and its arguments.
//!
//! [`CacheManager`]: crate::manager::CacheManager

mod key;
mod wrapper;

pub use key::{derive_key, CallArgs, KeyArgs};
pub use wrapper::{async_cached, cached, AsyncMemoized, MemoizeOptions, Memoized};
