use crate::domain::task::{TASK_STATUSES, Task};
use crate::error::{AppError, Result};
use crate::storage::task_repo::{TaskFilter, TaskRepository};
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub budget: Option<Decimal>,
    pub status: Option<String>,
    pub category_id: Option<Uuid>,
}

#[derive(Clone, Debug)]
pub struct TaskService {
    repo: TaskRepository,
}

impl TaskService {
    #[must_use]
    pub const fn new(repo: TaskRepository) -> Self {
        Self { repo }
    }

    /// # Errors
    /// Returns `AppError::Validation` on an empty title.
    #[tracing::instrument(err(level = "warn"), skip(self, title, description))]
    pub async fn create(
        &self,
        poster_id: Uuid,
        title: &str,
        description: &str,
        budget: Option<Decimal>,
        category_id: Option<Uuid>,
    ) -> Result<Task> {
        if title.trim().is_empty() {
            return Err(AppError::Validation("Title cannot be empty".into()));
        }
        self.repo.create(poster_id, title, description, budget, category_id).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Task> {
        self.repo.find_by_id(id).await?.ok_or(AppError::NotFound)
    }

    pub async fn list(&self, filter: &TaskFilter, limit: i64, offset: i64) -> Result<(Vec<Task>, i64)> {
        if let Some(status) = &filter.status
            && !TASK_STATUSES.contains(&status.as_str())
        {
            return Err(AppError::Validation(format!("Unknown task status '{status}'")));
        }
        let tasks = self.repo.list(filter, limit, offset).await?;
        let total = self.repo.count(filter).await?;
        Ok((tasks, total))
    }

    /// Owner-only update.
    ///
    /// # Errors
    /// Returns `AppError::Forbidden` when the requester did not post the task.
    #[tracing::instrument(err(level = "warn"), skip(self, update))]
    pub async fn update(&self, id: Uuid, requester_id: Uuid, update: TaskUpdate) -> Result<Task> {
        if let Some(status) = &update.status
            && !TASK_STATUSES.contains(&status.as_str())
        {
            return Err(AppError::Validation(format!("Unknown task status '{status}'")));
        }

        let task = self.repo.find_by_id(id).await?.ok_or(AppError::NotFound)?;
        if task.poster_id != requester_id {
            return Err(AppError::Forbidden);
        }

        self.repo
            .update(
                id,
                update.title.as_deref(),
                update.description.as_deref(),
                update.budget,
                update.status.as_deref(),
                update.category_id,
            )
            .await
    }

    /// Owner-only delete.
    ///
    /// # Errors
    /// Returns `AppError::Forbidden` when the requester did not post the task.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn delete(&self, id: Uuid, requester_id: Uuid) -> Result<()> {
        let task = self.repo.find_by_id(id).await?.ok_or(AppError::NotFound)?;
        if task.poster_id != requester_id {
            return Err(AppError::Forbidden);
        }
        self.repo.delete(id).await
    }
}
