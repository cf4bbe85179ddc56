use rust_decimal::Decimal;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

pub const BID_STATUSES: &[&str] = &["pending", "accepted", "rejected", "withdrawn"];

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TaskBid {
    pub id: Uuid,
    pub task_id: Uuid,
    pub bidder_id: Uuid,
    pub amount: Decimal,
    pub comment: Option<String>,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
