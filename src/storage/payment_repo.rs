use crate::domain::payment::Payment;
use crate::error::Result;
use crate::storage::DbPool;
use rust_decimal::Decimal;
use uuid::Uuid;

const PAYMENT_COLUMNS: &str = "id, task_id, payer_id, payee_id, amount, status, created_at";

#[derive(Clone, Debug)]
pub struct PaymentRepository {
    pool: DbPool,
}

impl PaymentRepository {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, task_id: Uuid, payer_id: Uuid, payee_id: Uuid, amount: Decimal) -> Result<Payment> {
        let payment = sqlx::query_as::<_, Payment>(&format!(
            "INSERT INTO payments (task_id, payer_id, payee_id, amount) \
             VALUES ($1, $2, $3, $4) RETURNING {PAYMENT_COLUMNS}"
        ))
        .bind(task_id)
        .bind(payer_id)
        .bind(payee_id)
        .bind(amount)
        .fetch_one(&self.pool)
        .await?;

        Ok(payment)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Payment>> {
        let payment = sqlx::query_as::<_, Payment>(&format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(payment)
    }

    pub async fn list(&self, task_id: Option<Uuid>, user_id: Option<Uuid>, limit: i64, offset: i64) -> Result<Vec<Payment>> {
        let payments = sqlx::query_as::<_, Payment>(&format!(
            r#"
            SELECT {PAYMENT_COLUMNS}
            FROM payments
            WHERE ($1::uuid IS NULL OR task_id = $1)
              AND ($2::uuid IS NULL OR payer_id = $2 OR payee_id = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(task_id)
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    pub async fn count(&self, task_id: Option<Uuid>, user_id: Option<Uuid>) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM payments
            WHERE ($1::uuid IS NULL OR task_id = $1)
              AND ($2::uuid IS NULL OR payer_id = $2 OR payee_id = $2)
            "#,
        )
        .bind(task_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    pub async fn update_status(&self, id: Uuid, status: &str) -> Result<Payment> {
        let payment = sqlx::query_as::<_, Payment>(&format!(
            "UPDATE payments SET status = $2 WHERE id = $1 RETURNING {PAYMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok(payment)
    }
}
