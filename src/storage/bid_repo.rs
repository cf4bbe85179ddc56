use crate::domain::bid::TaskBid;
use crate::error::Result;
use crate::storage::DbPool;
use rust_decimal::Decimal;
use uuid::Uuid;

const BID_COLUMNS: &str = "id, task_id, bidder_id, amount, comment, status, created_at";

#[derive(Clone, Debug)]
pub struct BidRepository {
    pool: DbPool,
}

impl BidRepository {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Inserts a bid; the unique (task, bidder) index surfaces duplicates as a
    /// database error the caller maps to 409.
    pub async fn create(
        &self,
        task_id: Uuid,
        bidder_id: Uuid,
        amount: Decimal,
        comment: Option<&str>,
    ) -> std::result::Result<TaskBid, sqlx::Error> {
        sqlx::query_as::<_, TaskBid>(&format!(
            "INSERT INTO task_bids (task_id, bidder_id, amount, comment) \
             VALUES ($1, $2, $3, $4) RETURNING {BID_COLUMNS}"
        ))
        .bind(task_id)
        .bind(bidder_id)
        .bind(amount)
        .bind(comment)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<TaskBid>> {
        let bid = sqlx::query_as::<_, TaskBid>(&format!("SELECT {BID_COLUMNS} FROM task_bids WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(bid)
    }

    pub async fn list(&self, task_id: Option<Uuid>, bidder_id: Option<Uuid>, limit: i64, offset: i64) -> Result<Vec<TaskBid>> {
        let bids = sqlx::query_as::<_, TaskBid>(&format!(
            r#"
            SELECT {BID_COLUMNS}
            FROM task_bids
            WHERE ($1::uuid IS NULL OR task_id = $1)
              AND ($2::uuid IS NULL OR bidder_id = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(task_id)
        .bind(bidder_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(bids)
    }

    pub async fn count(&self, task_id: Option<Uuid>, bidder_id: Option<Uuid>) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM task_bids
            WHERE ($1::uuid IS NULL OR task_id = $1)
              AND ($2::uuid IS NULL OR bidder_id = $2)
            "#,
        )
        .bind(task_id)
        .bind(bidder_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    pub async fn update_status(&self, id: Uuid, status: &str) -> Result<TaskBid> {
        let bid = sqlx::query_as::<_, TaskBid>(&format!(
            "UPDATE task_bids SET status = $2 WHERE id = $1 RETURNING {BID_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok(bid)
    }
}
