use crate::domain::payment::{PAYMENT_STATUSES, Payment};
use crate::error::{AppError, Result};
use crate::storage::payment_repo::PaymentRepository;
use crate::storage::task_repo::TaskRepository;
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct PaymentService {
    payments: PaymentRepository,
    tasks: TaskRepository,
}

impl PaymentService {
    #[must_use]
    pub const fn new(payments: PaymentRepository, tasks: TaskRepository) -> Self {
        Self { payments, tasks }
    }

    /// Records a payment from the task owner to a payee.
    ///
    /// # Errors
    /// Returns `AppError::Forbidden` when someone other than the task owner
    /// tries to record it.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn record(&self, task_id: Uuid, payer_id: Uuid, payee_id: Uuid, amount: Decimal) -> Result<Payment> {
        if amount <= Decimal::ZERO {
            return Err(AppError::Validation("Payment amount must be positive".into()));
        }
        if payer_id == payee_id {
            return Err(AppError::Validation("Payer and payee must differ".into()));
        }

        let task = self.tasks.find_by_id(task_id).await?.ok_or(AppError::NotFound)?;
        if task.poster_id != payer_id {
            return Err(AppError::Forbidden);
        }

        self.payments.create(task_id, payer_id, payee_id, amount).await
    }

    pub async fn list(&self, task_id: Option<Uuid>, user_id: Option<Uuid>, limit: i64, offset: i64) -> Result<(Vec<Payment>, i64)> {
        let payments = self.payments.list(task_id, user_id, limit, offset).await?;
        let total = self.payments.count(task_id, user_id).await?;
        Ok((payments, total))
    }

    /// Payer-only status update.
    ///
    /// # Errors
    /// Returns `AppError::Forbidden` for anyone but the payer.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn set_status(&self, payment_id: Uuid, requester_id: Uuid, status: &str) -> Result<Payment> {
        if !PAYMENT_STATUSES.contains(&status) {
            return Err(AppError::Validation(format!("Unknown payment status '{status}'")));
        }

        let payment = self.payments.find_by_id(payment_id).await?.ok_or(AppError::NotFound)?;
        if payment.payer_id != requester_id {
            return Err(AppError::Forbidden);
        }

        self.payments.update_status(payment_id, status).await
    }
}
