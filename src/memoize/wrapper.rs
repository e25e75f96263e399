//! Memoizing wrappers around blocking and async callables.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use super::key::{derive_key, KeyArgs};
use crate::manager::{CacheManager, DEFAULT_TTL};

// == Memoize Options ==
/// TTL and key prefix shared by both wrapper kinds.
#[derive(Debug, Clone)]
pub struct MemoizeOptions {
    /// Lifetime of cached results
    pub ttl: Duration,
    /// Leading key segment, omitted when empty
    pub key_prefix: String,
}

impl Default for MemoizeOptions {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            key_prefix: String::new(),
        }
    }
}

impl MemoizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }
}

/// Returns the cached result for `key` if one exists and decodes as `T`.
async fn lookup<T: DeserializeOwned>(cache: &CacheManager, key: &str) -> Option<T> {
    let value = cache.get(key).await?;
    match serde_json::from_value(value) {
        Ok(hit) => {
            debug!("Memoized hit: {}", key);
            Some(hit)
        }
        Err(e) => {
            debug!("Ignoring cached value for {}: {}", key, e);
            None
        }
    }
}

/// Stores a freshly computed result. Failures are logged by the manager
/// and otherwise ignored.
async fn store<T: Serialize>(cache: &CacheManager, key: &str, result: &T, ttl: Duration) {
    cache.set_as(key, result, ttl).await;
}

// == Memoized ==
/// Blocking callable whose results are cached by argument.
///
/// The callable runs on tokio's blocking pool so the calling task's worker
/// thread stays free.
pub struct Memoized<F> {
    cache: Arc<CacheManager>,
    name: String,
    options: MemoizeOptions,
    func: Arc<F>,
}

impl<F> Memoized<F> {
    /// Cache key used for a call with `args`.
    pub fn key_for<A: KeyArgs>(&self, args: &A) -> String {
        derive_key(&self.options.key_prefix, &self.name, &args.call_args())
    }

    /// Returns the cached result for `args`, or runs the callable and caches
    /// what it returns.
    ///
    /// On a hit the callable is not invoked.
    ///
    /// # Panics
    ///
    /// A panic in the callable is resumed on the caller. Also panics if the
    /// runtime shuts down before the blocking task starts, since no result
    /// exists to return.
    pub async fn call<A, T>(&self, args: A) -> T
    where
        F: Fn(A) -> T + Send + Sync + 'static,
        A: KeyArgs + Send + 'static,
        T: Serialize + DeserializeOwned + Send + 'static,
    {
        let key = self.key_for(&args);
        if let Some(hit) = lookup(&self.cache, &key).await {
            return hit;
        }

        let func = Arc::clone(&self.func);
        let result = match tokio::task::spawn_blocking(move || func(args)).await {
            Ok(result) => result,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => panic!("memoized call {} cancelled by runtime shutdown: {}", self.name, e),
        };

        store(&self.cache, &key, &result, self.options.ttl).await;
        result
    }
}

// == Async Memoized ==
/// Async callable whose results are cached by argument.
pub struct AsyncMemoized<F> {
    cache: Arc<CacheManager>,
    name: String,
    options: MemoizeOptions,
    func: F,
}

impl<F> AsyncMemoized<F> {
    /// Cache key used for a call with `args`.
    pub fn key_for<A: KeyArgs>(&self, args: &A) -> String {
        derive_key(&self.options.key_prefix, &self.name, &args.call_args())
    }

    /// Returns the cached result for `args`, or awaits the callable and
    /// caches what it returns.
    ///
    /// On a hit the callable is not invoked.
    pub async fn call<A, T, Fut>(&self, args: A) -> T
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = T>,
        A: KeyArgs,
        T: Serialize + DeserializeOwned,
    {
        let key = self.key_for(&args);
        if let Some(hit) = lookup(&self.cache, &key).await {
            return hit;
        }

        let result = (self.func)(args).await;
        store(&self.cache, &key, &result, self.options.ttl).await;
        result
    }
}

/// Wraps a blocking callable so repeated calls with equal arguments reuse
/// a cached result.
///
/// ```ignore
/// let speak = cached(cache, "generate_speech", MemoizeOptions::new().key_prefix("tts"),
///     |(text,): (String,)| expensive_tts_call(&text));
/// let audio = speak.call(("hola".to_string(),)).await;
/// ```
pub fn cached<F>(
    cache: Arc<CacheManager>,
    name: impl Into<String>,
    options: MemoizeOptions,
    func: F,
) -> Memoized<F> {
    Memoized {
        cache,
        name: name.into(),
        options,
        func: Arc::new(func),
    }
}

/// Wraps an async callable so repeated calls with equal arguments reuse a
/// cached result.
pub fn async_cached<F>(
    cache: Arc<CacheManager>,
    name: impl Into<String>,
    options: MemoizeOptions,
    func: F,
) -> AsyncMemoized<F> {
    AsyncMemoized {
        cache,
        name: name.into(),
        options,
        func,
    }
}
