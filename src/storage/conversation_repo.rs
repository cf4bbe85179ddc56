use crate::domain::conversation::Conversation;
use crate::error::Result;
use crate::storage::DbPool;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct ConversationRepository {
    pool: DbPool,
}

impl ConversationRepository {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Inserts a conversation for the (task, client, worker) triple unless one
    /// already exists, then returns the canonical row. The unique index on the
    /// triple makes concurrent creators converge on a single conversation.
    ///
    /// Returns the conversation and whether this call created it.
    pub async fn find_or_create(&self, task_id: Uuid, client_id: Uuid, worker_id: Uuid) -> Result<(Conversation, bool)> {
        let inserted = sqlx::query_as::<_, Conversation>(
            r#"
            INSERT INTO conversations (task_id, client_id, worker_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (task_id, client_id, worker_id) DO NOTHING
            RETURNING id, task_id, client_id, worker_id, last_message_at, client_pinned, worker_pinned, created_at
            "#,
        )
        .bind(task_id)
        .bind(client_id)
        .bind(worker_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(conversation) = inserted {
            return Ok((conversation, true));
        }

        let existing = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT id, task_id, client_id, worker_id, last_message_at, client_pinned, worker_pinned, created_at
            FROM conversations
            WHERE task_id = $1 AND client_id = $2 AND worker_id = $3
            "#,
        )
        .bind(task_id)
        .bind(client_id)
        .bind(worker_id)
        .fetch_one(&self.pool)
        .await?;

        Ok((existing, false))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Conversation>> {
        let conversation = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT id, task_id, client_id, worker_id, last_message_at, client_pinned, worker_pinned, created_at
            FROM conversations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(conversation)
    }

    /// Fetches every conversation the user participates in. Pagination happens
    /// in the service after the viewer-relative pin sort; the pin flag cannot
    /// be ordered on here because it depends on which side the viewer is.
    pub async fn fetch_all_for_user(&self, user_id: Uuid) -> Result<Vec<Conversation>> {
        let conversations = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT id, task_id, client_id, worker_id, last_message_at, client_pinned, worker_pinned, created_at
            FROM conversations
            WHERE client_id = $1 OR worker_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(conversations)
    }

    pub async fn set_client_pinned(&self, id: Uuid, pinned: bool) -> Result<()> {
        sqlx::query("UPDATE conversations SET client_pinned = $2 WHERE id = $1")
            .bind(id)
            .bind(pinned)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn set_worker_pinned(&self, id: Uuid, pinned: bool) -> Result<()> {
        sqlx::query("UPDATE conversations SET worker_pinned = $2 WHERE id = $1")
            .bind(id)
            .bind(pinned)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Bumps the activity timestamp inside the caller's transaction so the
    /// message insert and the touch commit together.
    pub async fn touch_last_message_at(
        conn: &mut sqlx::PgConnection,
        id: Uuid,
        at: OffsetDateTime,
    ) -> Result<()> {
        sqlx::query("UPDATE conversations SET last_message_at = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(conn)
            .await?;
        Ok(())
    }
}
