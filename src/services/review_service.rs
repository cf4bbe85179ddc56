use crate::domain::review::Review;
use crate::error::{AppError, Result};
use crate::storage::review_repo::ReviewRepository;
use crate::storage::task_repo::TaskRepository;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct ReviewService {
    reviews: ReviewRepository,
    tasks: TaskRepository,
}

impl ReviewService {
    #[must_use]
    pub const fn new(reviews: ReviewRepository, tasks: TaskRepository) -> Self {
        Self { reviews, tasks }
    }

    /// Leaves a review on a task. One review per (task, reviewer); duplicates
    /// answer 409.
    ///
    /// # Errors
    /// Returns `AppError::Validation` for a rating outside 1..=5.
    #[tracing::instrument(err(level = "warn"), skip(self, comment))]
    pub async fn create(
        &self,
        task_id: Uuid,
        reviewer_id: Uuid,
        reviewee_id: Uuid,
        rating: i32,
        comment: Option<&str>,
    ) -> Result<Review> {
        if !(1..=5).contains(&rating) {
            return Err(AppError::Validation("Rating must be between 1 and 5".into()));
        }
        if reviewer_id == reviewee_id {
            return Err(AppError::Validation("Cannot review yourself".into()));
        }

        self.tasks.find_by_id(task_id).await?.ok_or(AppError::NotFound)?;

        self.reviews
            .create(task_id, reviewer_id, reviewee_id, rating, comment)
            .await
            .map_err(|e| AppError::from_db(e, "You already reviewed this task"))
    }

    pub async fn list(
        &self,
        task_id: Option<Uuid>,
        reviewee_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Review>, i64)> {
        let reviews = self.reviews.list(task_id, reviewee_id, limit, offset).await?;
        let total = self.reviews.count(task_id, reviewee_id).await?;
        Ok((reviews, total))
    }
}
