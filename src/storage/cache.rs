use crate::config::CacheConfig;
use crate::error::Result;
use redis::AsyncCommands;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;

/// Read-through cache over Redis. Every cache failure is swallowed and
/// treated as a miss; the cache is never load-bearing for correctness.
///
/// Concurrent misses on the same key each run the computation and race their
/// writes (last write wins). The only caller is the benchmark route, so no
/// stampede protection is attempted.
#[derive(Debug, Clone)]
pub struct RedisCache {
    client: redis::Client,
    prefix: String,
    ttl_secs: u64,
}

impl RedisCache {
    /// Creates the cache client. The connection is established lazily, so a
    /// missing Redis only degrades the benchmark route, not boot.
    ///
    /// # Errors
    /// Returns an error if the URL cannot be parsed.
    pub fn new(config: &CacheConfig, prefix: &str) -> anyhow::Result<Self> {
        let client = redis::Client::open(config.url.as_str())?;
        Ok(Self { client, prefix: prefix.to_string(), ttl_secs: config.ttl_secs })
    }

    /// Retrieves a cached value for a key.
    ///
    /// # Errors
    /// Returns an error if the Redis operation fails.
    pub async fn get(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let full_key = format!("{}{key}", self.prefix);
        let value: Option<Vec<u8>> = conn.get(full_key).await?;
        Ok(value)
    }

    /// Saves a value for a key with the cache's configured TTL.
    ///
    /// # Errors
    /// Returns an error if the Redis operation fails.
    pub async fn set(&self, key: &str, value: &[u8]) -> anyhow::Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let full_key = format!("{}{key}", self.prefix);
        let _: () = conn.set_ex(full_key, value, self.ttl_secs).await?;
        Ok(())
    }

    /// Deletes a key from the cache.
    ///
    /// # Errors
    /// Returns an error if the Redis operation fails.
    pub async fn delete(&self, key: &str) -> anyhow::Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let full_key = format!("{}{key}", self.prefix);
        let _: () = conn.del(full_key).await?;
        Ok(())
    }

    /// Returns the cached value for `key`, or runs `compute`, caches its
    /// result and returns it. Cache errors fall back to `compute`; only the
    /// computation itself can fail the call.
    pub async fn get_or_set<T, F, Fut>(&self, key: &str, compute: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match self.get(key).await {
            Ok(Some(raw)) => match serde_json::from_slice(&raw) {
                Ok(value) => return Ok(value),
                Err(e) => tracing::debug!(error = %e, key, "Discarding undecodable cache entry"),
            },
            Ok(None) => {}
            Err(e) => tracing::debug!(error = %e, key, "Cache read failed, treating as miss"),
        }

        let value = compute().await?;

        match serde_json::to_vec(&value) {
            Ok(raw) => {
                if let Err(e) = self.set(key, &raw).await {
                    tracing::debug!(error = %e, key, "Cache write failed");
                }
            }
            Err(e) => tracing::debug!(error = %e, key, "Failed to serialize value for cache"),
        }

        Ok(value)
    }

    /// Connectivity probe for the readiness endpoint.
    ///
    /// # Errors
    /// Returns an error if Redis is unreachable.
    pub async fn ping(&self) -> anyhow::Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
