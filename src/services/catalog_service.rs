use crate::domain::catalog::{Category, Skill};
use crate::error::{AppError, Result};
use crate::storage::catalog_repo::CatalogRepository;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct CatalogService {
    repo: CatalogRepository,
}

impl CatalogService {
    #[must_use]
    pub const fn new(repo: CatalogRepository) -> Self {
        Self { repo }
    }

    /// # Errors
    /// Returns `AppError::Conflict` on a duplicate category name.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn create_category(&self, name: &str) -> Result<Category> {
        if name.trim().is_empty() {
            return Err(AppError::Validation("Category name cannot be empty".into()));
        }
        self.repo.create_category(name).await.map_err(|e| AppError::from_db(e, "Category name already exists"))
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.repo.list_categories().await
    }

    /// # Errors
    /// Returns `AppError::Conflict` on a duplicate skill name.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn create_skill(&self, name: &str, category_id: Option<Uuid>) -> Result<Skill> {
        if name.trim().is_empty() {
            return Err(AppError::Validation("Skill name cannot be empty".into()));
        }
        self.repo.create_skill(name, category_id).await.map_err(|e| AppError::from_db(e, "Skill name already exists"))
    }

    pub async fn list_skills(&self, category_id: Option<Uuid>) -> Result<Vec<Skill>> {
        self.repo.list_skills(category_id).await
    }
}
