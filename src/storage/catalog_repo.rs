use crate::domain::catalog::{Category, Skill};
use crate::error::Result;
use crate::storage::DbPool;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct CatalogRepository {
    pool: DbPool,
}

impl CatalogRepository {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Inserts a category; the unique name index surfaces duplicates as a
    /// database error the caller maps to 409.
    pub async fn create_category(&self, name: &str) -> std::result::Result<Category, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name) VALUES ($1) RETURNING id, name, created_at",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name, created_at FROM categories ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await?;

        Ok(categories)
    }

    pub async fn create_skill(&self, name: &str, category_id: Option<Uuid>) -> std::result::Result<Skill, sqlx::Error> {
        sqlx::query_as::<_, Skill>(
            "INSERT INTO skills (name, category_id) VALUES ($1, $2) RETURNING id, name, category_id, created_at",
        )
        .bind(name)
        .bind(category_id)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn list_skills(&self, category_id: Option<Uuid>) -> Result<Vec<Skill>> {
        let skills = sqlx::query_as::<_, Skill>(
            r#"
            SELECT id, name, category_id, created_at
            FROM skills
            WHERE ($1::uuid IS NULL OR category_id = $1)
            ORDER BY name ASC
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(skills)
    }
}
