//! Redis cache implementation using bb8 connection pool.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use bb8::{Pool, PooledConnection};
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, RedisError};

use crate::cache::entry::{CacheValue, Entry, decode, encode};
use crate::cache::{Cache, CacheError};
use crate::config::RedisConfig;

type RedisPool = Pool<Client>;

/// Keys requested per SCAN page during bulk clears.
const SCAN_PAGE_SIZE: usize = 200;

/// Redis-backed cache with bb8 connection pool.
///
/// Every key is namespaced under the configured prefix, so bulk clears
/// stay inside this client's keyspace. All commands are bounded by the
/// configured response timeout and surface as transport errors on expiry.
pub struct RedisCache {
    pool: RedisPool,
    key_prefix: String,
    response_timeout: Duration,
}

fn namespace_pattern(prefix: &str) -> String {
    format!("{}:*", prefix)
}

fn match_pattern(prefix: &str, pattern: &str) -> String {
    format!("{}:*{}*", prefix, pattern)
}

impl RedisCache {
    pub async fn new(config: &RedisConfig) -> Result<Self, CacheError> {
        let client =
            Client::open(config.url().as_str()).map_err(|e| CacheError::Transport(e.to_string()))?;

        let pool = Pool::builder()
            .max_size(config.pool_size)
            .connection_timeout(Duration::from_secs(config.connection_timeout))
            .build(client)
            .await
            .map_err(|e| CacheError::Transport(e.to_string()))?;

        Ok(Self {
            pool,
            key_prefix: config.key_prefix.clone(),
            response_timeout: Duration::from_secs(config.response_timeout),
        })
    }

    fn prefixed_key(&self, key: &str) -> String {
        format!("{}:{}", self.key_prefix, key)
    }

    async fn get_conn(&self) -> Result<PooledConnection<'_, Client>, CacheError> {
        self.pool
            .get()
            .await
            .map_err(|e| CacheError::Transport(e.to_string()))
    }

    /// Bound a driver call by the configured response timeout.
    async fn timed<T, F>(&self, fut: F) -> Result<T, CacheError>
    where
        F: Future<Output = Result<T, RedisError>>,
    {
        match tokio::time::timeout(self.response_timeout, fut).await {
            Ok(result) => result.map_err(|e| CacheError::Transport(e.to_string())),
            Err(_) => Err(CacheError::Transport(format!(
                "command timed out after {}s",
                self.response_timeout.as_secs()
            ))),
        }
    }

    /// Enumerate keys matching `pattern` one cursor page at a time and
    /// delete each page before fetching the next.
    ///
    /// Pagination keeps memory bounded on large keyspaces. A key removed by
    /// another caller between scan and delete counts as zero deletions.
    async fn scan_delete(&self, pattern: &str) -> Result<(), CacheError> {
        let mut conn = self.get_conn().await?;
        let mut cursor: u64 = 0;
        let mut removed: u64 = 0;

        loop {
            let conn_ref: &mut MultiplexedConnection = &mut conn;
            let (next, keys): (u64, Vec<String>) = self
                .timed(
                    redis::cmd("SCAN")
                        .arg(cursor)
                        .arg("MATCH")
                        .arg(pattern)
                        .arg("COUNT")
                        .arg(SCAN_PAGE_SIZE)
                        .query_async(conn_ref),
                )
                .await?;

            if !keys.is_empty() {
                let conn_ref: &mut MultiplexedConnection = &mut conn;
                let deleted: u64 = self.timed(conn_ref.del(keys)).await?;
                removed += deleted;
            }

            cursor = next;
            if cursor == 0 {
                break;
            }
        }

        tracing::debug!(pattern = %pattern, removed, "bulk clear finished");
        Ok(())
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn has(&self, key: &str) -> Result<bool, CacheError> {
        let mut conn = self.get_conn().await?;
        let prefixed = self.prefixed_key(key);

        let conn_ref: &mut MultiplexedConnection = &mut conn;
        self.timed(conn_ref.exists(&prefixed)).await
    }

    async fn get(&self, key: &str) -> Result<CacheValue, CacheError> {
        let mut conn = self.get_conn().await?;
        let prefixed = self.prefixed_key(key);

        let conn_ref: &mut MultiplexedConnection = &mut conn;
        let payload: Option<Vec<u8>> = self.timed(conn_ref.get(&prefixed)).await?;
        let payload = payload.ok_or_else(|| CacheError::NotFound(key.to_string()))?;

        let mut entry = decode(&payload)?;
        entry.remove(key).ok_or_else(|| {
            CacheError::Codec(format!("payload for '{}' does not contain its key", key))
        })
    }

    async fn set(
        &self,
        key: &str,
        value: CacheValue,
        ttl_seconds: Option<u64>,
    ) -> Result<(), CacheError> {
        let mut entry = Entry::new();
        entry.insert(key.to_string(), value);
        let payload = encode(&entry)?;

        let mut conn = self.get_conn().await?;
        let prefixed = self.prefixed_key(key);

        let conn_ref: &mut MultiplexedConnection = &mut conn;
        match ttl_seconds {
            Some(secs) => {
                self.timed(conn_ref.set_ex::<_, _, ()>(&prefixed, payload, secs))
                    .await
            }
            None => self.timed(conn_ref.set::<_, _, ()>(&prefixed, payload)).await,
        }
    }

    async fn forget(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.get_conn().await?;
        let prefixed = self.prefixed_key(key);

        let conn_ref: &mut MultiplexedConnection = &mut conn;
        self.timed(conn_ref.del::<_, ()>(&prefixed)).await
    }

    async fn empty(&self) -> Result<(), CacheError> {
        self.scan_delete(&namespace_pattern(&self.key_prefix)).await
    }

    async fn empty_by_match(&self, pattern: &str) -> Result<(), CacheError> {
        self.scan_delete(&match_pattern(&self.key_prefix, pattern))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_pattern_scoped_to_prefix() {
        assert_eq!(namespace_pattern("remcache"), "remcache:*");
    }

    #[test]
    fn test_match_pattern_is_substring_match() {
        // "alpha" must match both "alpha" and "alpha2"
        assert_eq!(match_pattern("remcache", "alpha"), "remcache:*alpha*");
    }
}
