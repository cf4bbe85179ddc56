use crate::storage::DbPool;
use crate::storage::cache::RedisCache;

#[derive(Clone, Debug)]
pub struct HealthService {
    pool: DbPool,
    cache: RedisCache,
}

impl HealthService {
    #[must_use]
    pub const fn new(pool: DbPool, cache: RedisCache) -> Self {
        Self { pool, cache }
    }

    /// # Errors
    /// Returns an error if the database is unreachable.
    pub async fn check_db(&self) -> anyhow::Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// # Errors
    /// Returns an error if the cache is unreachable. The cache is not
    /// load-bearing, so the readiness handler reports this without flipping
    /// the probe.
    pub async fn check_cache(&self) -> anyhow::Result<()> {
        self.cache.ping().await
    }
}
