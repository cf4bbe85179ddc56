use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

pub mod bid_repo;
pub mod cache;
pub mod catalog_repo;
pub mod conversation_repo;
pub mod message_repo;
pub mod payment_repo;
pub mod review_repo;
pub mod task_repo;
pub mod user_repo;

pub type DbPool = Pool<Postgres>;

/// Initializes the database connection pool.
///
/// # Errors
/// Returns `sqlx::Error` if the connection fails.
pub async fn init_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new().max_connections(20).connect(database_url).await
}

/// Applies pending migrations.
///
/// # Errors
/// Returns an error if a migration fails to apply.
pub async fn run_migrations(pool: &DbPool) -> anyhow::Result<()> {
    sqlx::migrate!().run(pool).await?;
    Ok(())
}
