use crate::domain::catalog::Skill;
use crate::domain::user::User;
use crate::error::Result;
use crate::storage::DbPool;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT id, name, image, created_at FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, name, image, created_at FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users").fetch_one(&self.pool).await?;
        Ok(count)
    }

    pub async fn update(&self, id: Uuid, name: Option<&str>, image: Option<&str>) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name), image = COALESCE($3, image)
            WHERE id = $1
            RETURNING id, name, image, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(image)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn skills_of(&self, user_id: Uuid) -> Result<Vec<Skill>> {
        let skills = sqlx::query_as::<_, Skill>(
            r#"
            SELECT s.id, s.name, s.category_id, s.created_at
            FROM skills s
            JOIN user_skills us ON us.skill_id = s.id
            WHERE us.user_id = $1
            ORDER BY s.name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(skills)
    }

    /// Idempotent: tagging a skill twice is a no-op. Unknown skill ids
    /// surface as a foreign-key violation the caller maps to 404.
    pub async fn add_skill(&self, user_id: Uuid, skill_id: Uuid) -> std::result::Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO user_skills (user_id, skill_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
            .bind(user_id)
            .bind(skill_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn remove_skill(&self, user_id: Uuid, skill_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM user_skills WHERE user_id = $1 AND skill_id = $2")
            .bind(user_id)
            .bind(skill_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
