use crate::domain::review::Review;
use crate::error::Result;
use crate::storage::DbPool;
use uuid::Uuid;

const REVIEW_COLUMNS: &str = "id, task_id, reviewer_id, reviewee_id, rating, comment, created_at";

#[derive(Clone, Debug)]
pub struct ReviewRepository {
    pool: DbPool,
}

impl ReviewRepository {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Inserts a review; the unique (task, reviewer) index surfaces duplicates
    /// as a database error the caller maps to 409.
    pub async fn create(
        &self,
        task_id: Uuid,
        reviewer_id: Uuid,
        reviewee_id: Uuid,
        rating: i32,
        comment: Option<&str>,
    ) -> std::result::Result<Review, sqlx::Error> {
        sqlx::query_as::<_, Review>(&format!(
            "INSERT INTO reviews (task_id, reviewer_id, reviewee_id, rating, comment) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {REVIEW_COLUMNS}"
        ))
        .bind(task_id)
        .bind(reviewer_id)
        .bind(reviewee_id)
        .bind(rating)
        .bind(comment)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn list(
        &self,
        task_id: Option<Uuid>,
        reviewee_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(&format!(
            r#"
            SELECT {REVIEW_COLUMNS}
            FROM reviews
            WHERE ($1::uuid IS NULL OR task_id = $1)
              AND ($2::uuid IS NULL OR reviewee_id = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(task_id)
        .bind(reviewee_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    pub async fn count(&self, task_id: Option<Uuid>, reviewee_id: Option<Uuid>) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM reviews
            WHERE ($1::uuid IS NULL OR task_id = $1)
              AND ($2::uuid IS NULL OR reviewee_id = $2)
            "#,
        )
        .bind(task_id)
        .bind(reviewee_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
