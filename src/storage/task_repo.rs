use crate::domain::task::Task;
use crate::error::Result;
use crate::storage::DbPool;
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, Default, Clone)]
pub struct TaskFilter {
    pub status: Option<String>,
    pub category_id: Option<Uuid>,
    pub poster_id: Option<Uuid>,
}

const TASK_COLUMNS: &str = "id, poster_id, title, description, budget, status, category_id, created_at";

#[derive(Clone, Debug)]
pub struct TaskRepository {
    pool: DbPool,
}

impl TaskRepository {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        poster_id: Uuid,
        title: &str,
        description: &str,
        budget: Option<Decimal>,
        category_id: Option<Uuid>,
    ) -> Result<Task> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (poster_id, title, description, budget, category_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {TASK_COLUMNS}"
        ))
        .bind(poster_id)
        .bind(title)
        .bind(description)
        .bind(budget)
        .bind(category_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(task)
    }

    pub async fn list(&self, filter: &TaskFilter, limit: i64, offset: i64) -> Result<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR category_id = $2)
              AND ($3::uuid IS NULL OR poster_id = $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(filter.status.as_deref())
        .bind(filter.category_id)
        .bind(filter.poster_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    pub async fn count(&self, filter: &TaskFilter) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM tasks
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR category_id = $2)
              AND ($3::uuid IS NULL OR poster_id = $3)
            "#,
        )
        .bind(filter.status.as_deref())
        .bind(filter.category_id)
        .bind(filter.poster_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    pub async fn update(
        &self,
        id: Uuid,
        title: Option<&str>,
        description: Option<&str>,
        budget: Option<Decimal>,
        status: Option<&str>,
        category_id: Option<Uuid>,
    ) -> Result<Task> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                budget = COALESCE($4, budget),
                status = COALESCE($5, status),
                category_id = COALESCE($6, category_id)
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(title)
        .bind(description)
        .bind(budget)
        .bind(status)
        .bind(category_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM tasks WHERE id = $1").bind(id).execute(&self.pool).await?;
        Ok(())
    }
}
