use crate::domain::catalog::Skill;
use crate::domain::user::User;
use crate::error::{AppError, Result};
use crate::storage::user_repo::UserRepository;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct UserService {
    repo: UserRepository,
}

impl UserService {
    #[must_use]
    pub const fn new(repo: UserRepository) -> Self {
        Self { repo }
    }

    pub async fn get(&self, id: Uuid) -> Result<User> {
        self.repo.find_by_id(id).await?.ok_or(AppError::NotFound)
    }

    pub async fn list(&self, limit: i64, offset: i64) -> Result<(Vec<User>, i64)> {
        let users = self.repo.list(limit, offset).await?;
        let total = self.repo.count().await?;
        Ok((users, total))
    }

    /// Self-only profile update.
    ///
    /// # Errors
    /// Returns `AppError::Forbidden` when updating someone else's profile.
    #[tracing::instrument(err(level = "warn"), skip(self, name, image))]
    pub async fn update(&self, id: Uuid, requester_id: Uuid, name: Option<&str>, image: Option<&str>) -> Result<User> {
        if id != requester_id {
            return Err(AppError::Forbidden);
        }
        if let Some(name) = name
            && name.trim().is_empty()
        {
            return Err(AppError::Validation("Name cannot be empty".into()));
        }

        self.repo.update(id, name, image).await?.ok_or(AppError::NotFound)
    }

    pub async fn list_skills(&self, user_id: Uuid) -> Result<Vec<Skill>> {
        self.repo.find_by_id(user_id).await?.ok_or(AppError::NotFound)?;
        self.repo.skills_of(user_id).await
    }

    /// Self-only skill tagging. Tagging twice is a no-op.
    ///
    /// # Errors
    /// Returns `AppError::NotFound` for an unknown skill id.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn add_skill(&self, user_id: Uuid, requester_id: Uuid, skill_id: Uuid) -> Result<()> {
        if user_id != requester_id {
            return Err(AppError::Forbidden);
        }

        self.repo.add_skill(user_id, skill_id).await.map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => AppError::NotFound,
            _ => AppError::Database(e),
        })
    }

    /// Self-only skill removal.
    ///
    /// # Errors
    /// Returns `AppError::NotFound` when the tag was not present.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn remove_skill(&self, user_id: Uuid, requester_id: Uuid, skill_id: Uuid) -> Result<()> {
        if user_id != requester_id {
            return Err(AppError::Forbidden);
        }

        if self.repo.remove_skill(user_id, skill_id).await? { Ok(()) } else { Err(AppError::NotFound) }
    }
}
