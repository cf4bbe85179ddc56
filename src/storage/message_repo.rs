use crate::domain::message::{Message, MessageWithSender};
use crate::domain::user::UserSummary;
use crate::error::Result;
use crate::storage::DbPool;
use time::OffsetDateTime;
use uuid::Uuid;

/// Optional filters for the message listing endpoint.
#[derive(Debug, Default, Clone, Copy)]
pub struct MessageFilter {
    pub conversation_id: Option<Uuid>,
    pub task_id: Option<Uuid>,
    pub sender_id: Option<Uuid>,
    pub is_read: Option<bool>,
}

#[derive(sqlx::FromRow)]
struct MessageWithSenderRow {
    id: Uuid,
    conversation_id: Uuid,
    sender_id: Uuid,
    task_id: Uuid,
    content: String,
    is_read: bool,
    created_at: OffsetDateTime,
    sender_name: String,
    sender_image: Option<String>,
}

impl From<MessageWithSenderRow> for MessageWithSender {
    fn from(row: MessageWithSenderRow) -> Self {
        Self {
            message: Message {
                id: row.id,
                conversation_id: row.conversation_id,
                sender_id: row.sender_id,
                task_id: row.task_id,
                content: row.content,
                is_read: row.is_read,
                created_at: row.created_at,
            },
            sender: UserSummary { id: row.sender_id, name: row.sender_name, image: row.sender_image },
        }
    }
}

#[derive(Clone, Debug)]
pub struct MessageRepository {
    pool: DbPool,
}

impl MessageRepository {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Inserts a message inside the caller's transaction. The task id is
    /// denormalized from the conversation by the caller.
    pub async fn create(
        conn: &mut sqlx::PgConnection,
        conversation_id: Uuid,
        sender_id: Uuid,
        task_id: Uuid,
        content: &str,
    ) -> Result<Message> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (conversation_id, sender_id, task_id, content)
            VALUES ($1, $2, $3, $4)
            RETURNING id, conversation_id, sender_id, task_id, content, is_read, created_at
            "#,
        )
        .bind(conversation_id)
        .bind(sender_id)
        .bind(task_id)
        .bind(content)
        .fetch_one(conn)
        .await?;

        Ok(message)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Message>> {
        let message = sqlx::query_as::<_, Message>(
            "SELECT id, conversation_id, sender_id, task_id, content, is_read, created_at FROM messages WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(message)
    }

    pub async fn list(&self, filter: MessageFilter, limit: i64, offset: i64) -> Result<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, conversation_id, sender_id, task_id, content, is_read, created_at
            FROM messages
            WHERE ($1::uuid IS NULL OR conversation_id = $1)
              AND ($2::uuid IS NULL OR task_id = $2)
              AND ($3::uuid IS NULL OR sender_id = $3)
              AND ($4::boolean IS NULL OR is_read = $4)
            ORDER BY created_at ASC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(filter.conversation_id)
        .bind(filter.task_id)
        .bind(filter.sender_id)
        .bind(filter.is_read)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    pub async fn count(&self, filter: MessageFilter) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM messages
            WHERE ($1::uuid IS NULL OR conversation_id = $1)
              AND ($2::uuid IS NULL OR task_id = $2)
              AND ($3::uuid IS NULL OR sender_id = $3)
              AND ($4::boolean IS NULL OR is_read = $4)
            "#,
        )
        .bind(filter.conversation_id)
        .bind(filter.task_id)
        .bind(filter.sender_id)
        .bind(filter.is_read)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Full ordered history of one conversation, each message with its sender
    /// summary attached.
    pub async fn history_with_senders(&self, conversation_id: Uuid) -> Result<Vec<MessageWithSender>> {
        let rows = sqlx::query_as::<_, MessageWithSenderRow>(
            r#"
            SELECT m.id, m.conversation_id, m.sender_id, m.task_id, m.content, m.is_read, m.created_at,
                   u.name AS sender_name, u.image AS sender_image
            FROM messages m
            JOIN users u ON u.id = m.sender_id
            WHERE m.conversation_id = $1
            ORDER BY m.created_at ASC
            "#,
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn last_with_sender(&self, conversation_id: Uuid) -> Result<Option<MessageWithSender>> {
        let row = sqlx::query_as::<_, MessageWithSenderRow>(
            r#"
            SELECT m.id, m.conversation_id, m.sender_id, m.task_id, m.content, m.is_read, m.created_at,
                   u.name AS sender_name, u.image AS sender_image
            FROM messages m
            JOIN users u ON u.id = m.sender_id
            WHERE m.conversation_id = $1
            ORDER BY m.created_at DESC
            LIMIT 1
            "#,
        )
        .bind(conversation_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Flips the read flag on every matching message, whatever conversation it
    /// belongs to, and reports which conversations were touched.
    pub async fn mark_read(&self, message_ids: &[Uuid]) -> Result<Vec<(Uuid, Uuid)>> {
        let rows: Vec<(Uuid, Uuid)> = sqlx::query_as(
            r#"
            UPDATE messages
            SET is_read = TRUE
            WHERE id = ANY($1) AND is_read = FALSE
            RETURNING id, conversation_id
            "#,
        )
        .bind(message_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Messages the viewer received in this conversation and has not read.
    /// Recomputed on every call; never cached.
    pub async fn unread_count(&self, conversation_id: Uuid, viewer_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM messages
            WHERE conversation_id = $1 AND is_read = FALSE AND sender_id != $2
            "#,
        )
        .bind(conversation_id)
        .bind(viewer_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    pub async fn update_content(&self, id: Uuid, content: &str) -> Result<Message> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            UPDATE messages
            SET content = $2
            WHERE id = $1
            RETURNING id, conversation_id, sender_id, task_id, content, is_read, created_at
            "#,
        )
        .bind(id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        Ok(message)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM messages WHERE id = $1").bind(id).execute(&self.pool).await?;
        Ok(())
    }
}
