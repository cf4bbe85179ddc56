use crate::domain::bid::{BID_STATUSES, TaskBid};
use crate::error::{AppError, Result};
use crate::storage::bid_repo::BidRepository;
use crate::storage::task_repo::TaskRepository;
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct BidService {
    bids: BidRepository,
    tasks: TaskRepository,
}

impl BidService {
    #[must_use]
    pub const fn new(bids: BidRepository, tasks: TaskRepository) -> Self {
        Self { bids, tasks }
    }

    /// Places a bid on a task. One bid per (task, bidder); duplicates answer
    /// 409. Posters cannot bid on their own tasks.
    ///
    /// # Errors
    /// Returns `AppError::NotFound` if the task is absent and
    /// `AppError::Conflict` on a duplicate bid.
    #[tracing::instrument(err(level = "warn"), skip(self, comment))]
    pub async fn place(&self, task_id: Uuid, bidder_id: Uuid, amount: Decimal, comment: Option<&str>) -> Result<TaskBid> {
        if amount <= Decimal::ZERO {
            return Err(AppError::Validation("Bid amount must be positive".into()));
        }

        let task = self.tasks.find_by_id(task_id).await?.ok_or(AppError::NotFound)?;
        if task.poster_id == bidder_id {
            return Err(AppError::Validation("Cannot bid on your own task".into()));
        }

        self.bids
            .create(task_id, bidder_id, amount, comment)
            .await
            .map_err(|e| AppError::from_db(e, "A bid for this task already exists"))
    }

    pub async fn list(&self, task_id: Option<Uuid>, bidder_id: Option<Uuid>, limit: i64, offset: i64) -> Result<(Vec<TaskBid>, i64)> {
        let bids = self.bids.list(task_id, bidder_id, limit, offset).await?;
        let total = self.bids.count(task_id, bidder_id).await?;
        Ok((bids, total))
    }

    /// Status transitions: the task owner accepts or rejects, the bidder may
    /// withdraw their own bid.
    ///
    /// # Errors
    /// Returns `AppError::Forbidden` for any other requester/status pairing.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn set_status(&self, bid_id: Uuid, requester_id: Uuid, status: &str) -> Result<TaskBid> {
        if !BID_STATUSES.contains(&status) {
            return Err(AppError::Validation(format!("Unknown bid status '{status}'")));
        }

        let bid = self.bids.find_by_id(bid_id).await?.ok_or(AppError::NotFound)?;
        let task = self.tasks.find_by_id(bid.task_id).await?.ok_or(AppError::NotFound)?;

        let allowed = match status {
            "accepted" | "rejected" => requester_id == task.poster_id,
            "withdrawn" => requester_id == bid.bidder_id,
            _ => false,
        };
        if !allowed {
            return Err(AppError::Forbidden);
        }

        self.bids.update_status(bid_id, status).await
    }
}
