use crate::config::MessagingConfig;
use crate::domain::message::Message;
use crate::error::{AppError, Result};
use crate::services::realtime::{Notifier, ServerEvent};
use crate::storage::DbPool;
use crate::storage::conversation_repo::ConversationRepository;
use crate::storage::message_repo::{MessageFilter, MessageRepository};
use std::collections::BTreeSet;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct MessageService {
    pool: DbPool,
    conversations: ConversationRepository,
    messages: MessageRepository,
    notifier: Arc<dyn Notifier>,
    config: MessagingConfig,
}

impl MessageService {
    #[must_use]
    pub fn new(
        pool: DbPool,
        conversations: ConversationRepository,
        messages: MessageRepository,
        notifier: Arc<dyn Notifier>,
        config: MessagingConfig,
    ) -> Self {
        Self { pool, conversations, messages, notifier, config }
    }

    fn validate_content(&self, content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Err(AppError::Validation("Message content cannot be empty".into()));
        }
        if content.chars().count() > self.config.max_content_length {
            return Err(AppError::Validation(format!(
                "Message content exceeds {} characters",
                self.config.max_content_length
            )));
        }
        Ok(())
    }

    /// Persists a message and notifies both participants. The insert and the
    /// conversation's activity-timestamp bump commit in one transaction; the
    /// emits run after commit and never fail the send.
    ///
    /// # Errors
    /// Returns `AppError::NotFound` if the conversation does not exist and
    /// `AppError::Forbidden` if the sender is not a participant.
    #[tracing::instrument(err(level = "warn"), skip(self, content), fields(conversation_id = %conversation_id))]
    pub async fn send(&self, conversation_id: Uuid, sender_id: Uuid, content: &str) -> Result<Message> {
        self.validate_content(content)?;

        let conversation = self.conversations.find_by_id(conversation_id).await?.ok_or(AppError::NotFound)?;
        if !conversation.is_participant(sender_id) {
            return Err(AppError::Forbidden);
        }

        let mut tx = self.pool.begin().await?;
        let message =
            MessageRepository::create(&mut *tx, conversation_id, sender_id, conversation.task_id, content).await?;
        ConversationRepository::touch_last_message_at(&mut *tx, conversation_id, message.created_at).await?;
        tx.commit().await?;

        tracing::debug!(message_id = %message.id, "Message stored");

        self.notifier
            .emit_to_room(conversation_id, ServerEvent::MessageNew { conversation_id, message: message.clone() });
        for participant in [conversation.client_id, conversation.worker_id] {
            self.notifier.emit_to_user(
                participant,
                ServerEvent::ConversationNewMessage {
                    conversation_id,
                    last_message: message.clone(),
                    sender_id,
                },
            );
        }

        Ok(message)
    }

    /// Marks a batch of messages read for `reader_id`. The batch may span
    /// conversations; each conversation touched gets exactly one
    /// `message:read` event carrying the requested id set and the reader.
    ///
    /// # Errors
    /// Returns `AppError::Validation` on an empty or oversized batch.
    #[tracing::instrument(err(level = "warn"), skip(self), fields(batch = message_ids.len()))]
    pub async fn mark_read(&self, message_ids: &[Uuid], reader_id: Uuid) -> Result<u64> {
        if message_ids.is_empty() {
            return Err(AppError::Validation("messageIds cannot be empty".into()));
        }
        if message_ids.len() > self.config.max_read_batch {
            return Err(AppError::Validation(format!(
                "Cannot acknowledge more than {} messages at once",
                self.config.max_read_batch
            )));
        }

        let affected = self.messages.mark_read(message_ids).await?;

        let touched: BTreeSet<Uuid> = affected.iter().map(|(_, conversation_id)| *conversation_id).collect();
        for conversation_id in touched {
            self.notifier.emit_to_room(
                conversation_id,
                ServerEvent::MessageRead { conversation_id, message_ids: message_ids.to_vec(), read_by: reader_id },
            );
        }

        Ok(affected.len() as u64)
    }

    /// Filtered message listing for the REST surface.
    ///
    /// # Errors
    /// Returns `AppError::Database` if a query fails.
    pub async fn list(&self, filter: MessageFilter, limit: i64, offset: i64) -> Result<(Vec<Message>, i64)> {
        let messages = self.messages.list(filter, limit, offset).await?;
        let total = self.messages.count(filter).await?;
        Ok((messages, total))
    }

    /// Edits a message's content. Sender-only.
    ///
    /// # Errors
    /// Returns `AppError::NotFound` if the message is absent and
    /// `AppError::Forbidden` for anyone but the sender.
    #[tracing::instrument(err(level = "warn"), skip(self, content))]
    pub async fn edit(&self, message_id: Uuid, editor_id: Uuid, content: &str) -> Result<Message> {
        self.validate_content(content)?;

        let message = self.messages.find_by_id(message_id).await?.ok_or(AppError::NotFound)?;
        if message.sender_id != editor_id {
            return Err(AppError::Forbidden);
        }

        self.messages.update_content(message_id, content).await
    }

    /// Deletes a message. Sender-only.
    ///
    /// # Errors
    /// Returns `AppError::NotFound` if the message is absent and
    /// `AppError::Forbidden` for anyone but the sender.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn delete(&self, message_id: Uuid, requester_id: Uuid) -> Result<()> {
        let message = self.messages.find_by_id(message_id).await?.ok_or(AppError::NotFound)?;
        if message.sender_id != requester_id {
            return Err(AppError::Forbidden);
        }

        self.messages.delete(message_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MessagingConfig;
    use crate::services::realtime::test_support::RecordingNotifier;
    use sqlx::postgres::PgPoolOptions;

    fn service(notifier: Arc<RecordingNotifier>) -> MessageService {
        // Lazy pool: never connects unless a query runs, which the validation
        // guards under test reject first.
        let pool = PgPoolOptions::new().connect_lazy("postgres://localhost/unused").expect("lazy pool");
        MessageService::new(
            pool.clone(),
            ConversationRepository::new(pool.clone()),
            MessageRepository::new(pool),
            notifier,
            MessagingConfig { max_content_length: 10, max_read_batch: 3 },
        )
    }

    #[tokio::test]
    async fn empty_content_is_rejected_before_any_query() {
        let notifier = Arc::new(RecordingNotifier::default());
        let svc = service(Arc::clone(&notifier));

        let err = svc.send(Uuid::new_v4(), Uuid::new_v4(), "   ").await.expect_err("should reject");
        assert!(matches!(err, AppError::Validation(_)));
        assert!(notifier.room_events.lock().expect("poisoned").is_empty());
    }

    #[tokio::test]
    async fn oversized_content_is_rejected() {
        let svc = service(Arc::new(RecordingNotifier::default()));
        let err = svc.send(Uuid::new_v4(), Uuid::new_v4(), "this is far too long").await.expect_err("should reject");
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn read_batch_limits_are_enforced() {
        let svc = service(Arc::new(RecordingNotifier::default()));

        let err = svc.mark_read(&[], Uuid::new_v4()).await.expect_err("empty batch");
        assert!(matches!(err, AppError::Validation(_)));

        let ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        let err = svc.mark_read(&ids, Uuid::new_v4()).await.expect_err("oversized batch");
        assert!(matches!(err, AppError::Validation(_)));
    }
}
