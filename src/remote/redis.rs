//! Redis-backed remote tier.

use std::collections::BTreeSet;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::RedisResult;
use tracing::info;

use super::{RemoteStats, RemoteStore};
use crate::error::{RemoteError, RemoteResult};

const SCAN_BATCH: usize = 500;

/// Remote tier talking to a Redis server over one multiplexed connection.
///
/// Every command is bounded by the configured timeout.
#[derive(Clone)]
pub struct RedisStore {
    conn: MultiplexedConnection,
    timeout: Duration,
}

impl RedisStore {
    /// Opens a connection and verifies it with PING.
    pub async fn connect(url: &str, timeout: Duration) -> RemoteResult<Self> {
        let client =
            redis::Client::open(url).map_err(|e| RemoteError::Connection(e.to_string()))?;

        let conn = tokio::time::timeout(timeout, client.get_multiplexed_async_connection())
            .await
            .map_err(|_| RemoteError::Timeout(timeout))?
            .map_err(|e| RemoteError::Connection(e.to_string()))?;

        let store = Self { conn, timeout };
        let pong: String = store.run(|mut conn| async move {
            redis::cmd("PING").query_async(&mut conn).await
        })
        .await?;
        info!("Redis connected ({})", pong);

        Ok(store)
    }

    async fn run<T, F, Fut>(&self, command: F) -> RemoteResult<T>
    where
        F: FnOnce(MultiplexedConnection) -> Fut,
        Fut: Future<Output = RedisResult<T>>,
    {
        tokio::time::timeout(self.timeout, command(self.conn.clone()))
            .await
            .map_err(|_| RemoteError::Timeout(self.timeout))?
            .map_err(RemoteError::from)
    }
}

/// Redis expiries are whole seconds; round up so entries never expire early.
fn ttl_seconds(ttl: Duration) -> u64 {
    let secs = ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0);
    secs.max(1)
}

/// Reads a numeric field from `INFO` output.
fn info_field(info: &str, field: &str) -> u64 {
    info.lines()
        .filter_map(|line| line.trim().split_once(':'))
        .find(|(name, _)| *name == field)
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}

#[async_trait]
impl RemoteStore for RedisStore {
    async fn get(&self, key: &str) -> RemoteResult<Option<String>> {
        self.run(|mut conn| async move {
            redis::cmd("GET").arg(key).query_async(&mut conn).await
        })
        .await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> RemoteResult<()> {
        let seconds = ttl_seconds(ttl);
        self.run(|mut conn| async move {
            redis::cmd("SET")
                .arg(key)
                .arg(value)
                .arg("EX")
                .arg(seconds)
                .query_async(&mut conn)
                .await
        })
        .await
    }

    async fn delete(&self, key: &str) -> RemoteResult<u64> {
        self.run(|mut conn| async move {
            redis::cmd("DEL").arg(key).query_async(&mut conn).await
        })
        .await
    }

    async fn scan(&self, pattern: &str) -> RemoteResult<Vec<String>> {
        // SCAN may report a key more than once; collect into a set.
        let mut keys = BTreeSet::new();
        let mut cursor: u64 = 0;
        loop {
            let (next, batch): (u64, Vec<String>) = self
                .run(|mut conn| async move {
                    redis::cmd("SCAN")
                        .arg(cursor)
                        .arg("MATCH")
                        .arg(pattern)
                        .arg("COUNT")
                        .arg(SCAN_BATCH)
                        .query_async(&mut conn)
                        .await
                })
                .await?;
            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }
        Ok(keys.into_iter().collect())
    }

    async fn delete_many(&self, keys: &[String]) -> RemoteResult<u64> {
        if keys.is_empty() {
            return Ok(0);
        }
        self.run(|mut conn| async move {
            redis::cmd("DEL").arg(keys).query_async(&mut conn).await
        })
        .await
    }

    async fn stats(&self) -> RemoteResult<RemoteStats> {
        let key_count: u64 = self
            .run(|mut conn| async move { redis::cmd("DBSIZE").query_async(&mut conn).await })
            .await?;
        let info: String = self
            .run(|mut conn| async move {
                redis::cmd("INFO").arg("stats").query_async(&mut conn).await
            })
            .await?;

        Ok(RemoteStats {
            key_count,
            hits: info_field(&info, "keyspace_hits"),
            misses: info_field(&info, "keyspace_misses"),
        })
    }
}
