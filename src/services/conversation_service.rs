use crate::domain::conversation::{Conversation, ConversationSummary, ConversationView, Role, derive_roles};
use crate::domain::message::MessageWithSender;
use crate::error::{AppError, Result};
use crate::services::realtime::{Notifier, ServerEvent};
use crate::storage::conversation_repo::ConversationRepository;
use crate::storage::message_repo::MessageRepository;
use crate::storage::task_repo::TaskRepository;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct ConversationService {
    tasks: TaskRepository,
    conversations: ConversationRepository,
    messages: MessageRepository,
    notifier: Arc<dyn Notifier>,
}

impl ConversationService {
    #[must_use]
    pub fn new(
        tasks: TaskRepository,
        conversations: ConversationRepository,
        messages: MessageRepository,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self { tasks, conversations, messages, notifier }
    }

    /// Returns the conversation for (task, requester, recipient), creating it
    /// on first contact. The client role always lands on the task poster's
    /// side, whichever party initiated.
    ///
    /// # Errors
    /// Returns `AppError::NotFound` if the task does not exist.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn get_or_create(&self, task_id: Uuid, requester_id: Uuid, recipient_id: Uuid) -> Result<Conversation> {
        if requester_id == recipient_id {
            return Err(AppError::Validation("Cannot start a conversation with yourself".into()));
        }

        let task = self.tasks.find_by_id(task_id).await?.ok_or(AppError::NotFound)?;
        let (client_id, worker_id) = derive_roles(task.poster_id, requester_id, recipient_id);

        let (conversation, created) = self.conversations.find_or_create(task_id, client_id, worker_id).await?;

        if created {
            tracing::debug!(conversation_id = %conversation.id, "Conversation created");
            for participant in [conversation.client_id, conversation.worker_id] {
                self.notifier.emit_to_user(
                    participant,
                    ServerEvent::ConversationUpdate {
                        conversation: ConversationView::for_viewer(conversation.clone(), participant),
                    },
                );
            }
        }

        Ok(conversation)
    }

    /// Fetches a conversation with its ordered message history.
    ///
    /// # Errors
    /// Returns `AppError::NotFound` when the conversation is absent or the
    /// viewer is not a participant; non-participants cannot tell the two
    /// apart.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn get_with_history(
        &self,
        conversation_id: Uuid,
        viewer_id: Uuid,
    ) -> Result<(ConversationView, Vec<MessageWithSender>)> {
        let conversation = self.conversations.find_by_id(conversation_id).await?.ok_or(AppError::NotFound)?;
        if !conversation.is_participant(viewer_id) {
            return Err(AppError::NotFound);
        }

        let history = self.messages.history_with_senders(conversation_id).await?;
        Ok((ConversationView::for_viewer(conversation, viewer_id), history))
    }

    /// Loads a conversation the caller participates in. Used by the gateway
    /// to authorize room joins.
    ///
    /// # Errors
    /// Returns `AppError::NotFound` when the conversation is absent or the
    /// caller is not a participant.
    pub async fn require_participant(&self, conversation_id: Uuid, user_id: Uuid) -> Result<Conversation> {
        let conversation = self.conversations.find_by_id(conversation_id).await?.ok_or(AppError::NotFound)?;
        if !conversation.is_participant(user_id) {
            return Err(AppError::NotFound);
        }
        Ok(conversation)
    }

    /// Lists the viewer's conversations, pinned first and then by recency,
    /// with the last message and unread count attached to each page entry.
    ///
    /// The pin flag depends on which side of each conversation the viewer is,
    /// so every conversation is fetched and the sort and page slice happen
    /// here rather than in SQL. Known not to scale to huge conversation
    /// counts; correctness over query efficiency.
    ///
    /// # Errors
    /// Returns `AppError::Database` if a query fails.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn list(&self, viewer_id: Uuid, page: i64, limit: i64) -> Result<(Vec<ConversationSummary>, i64)> {
        let all = self.conversations.fetch_all_for_user(viewer_id).await?;
        let total = all.len() as i64;

        let page_items = pin_first_page(all, viewer_id, page, limit);

        let mut summaries = Vec::with_capacity(page_items.len());
        for conversation in page_items {
            let unread_count = self.messages.unread_count(conversation.id, viewer_id).await?;
            let last_message = self.messages.last_with_sender(conversation.id).await?;
            summaries.push(ConversationSummary {
                view: ConversationView::for_viewer(conversation, viewer_id),
                unread_count,
                last_message,
            });
        }

        Ok((summaries, total))
    }

    /// Pins or unpins the conversation on the requester's side only. The
    /// counterpart's ordering is unaffected and is not notified; pin state is
    /// private.
    ///
    /// # Errors
    /// Returns `AppError::NotFound` if the conversation is absent and
    /// `AppError::Forbidden` if the requester is not a participant.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn set_pinned(&self, conversation_id: Uuid, requester_id: Uuid, pinned: bool) -> Result<ConversationView> {
        let mut conversation = self.conversations.find_by_id(conversation_id).await?.ok_or(AppError::NotFound)?;

        match conversation.role_of(requester_id) {
            Some(Role::Client) => {
                self.conversations.set_client_pinned(conversation_id, pinned).await?;
                conversation.client_pinned = pinned;
            }
            Some(Role::Worker) => {
                self.conversations.set_worker_pinned(conversation_id, pinned).await?;
                conversation.worker_pinned = pinned;
            }
            None => return Err(AppError::Forbidden),
        }

        let view = ConversationView::for_viewer(conversation, requester_id);
        self.notifier.emit_to_user(requester_id, ServerEvent::ConversationUpdate { conversation: view.clone() });

        Ok(view)
    }
}

/// Orders conversations for one viewer (pinned first, then most recent
/// activity) and slices out the requested page. Conversations that never had
/// a message sort after all active ones within their pin group.
#[must_use]
pub fn pin_first_page(mut conversations: Vec<Conversation>, viewer_id: Uuid, page: i64, limit: i64) -> Vec<Conversation> {
    conversations.sort_by(|a, b| {
        b.is_pinned_for(viewer_id)
            .cmp(&a.is_pinned_for(viewer_id))
            .then_with(|| b.last_message_at.cmp(&a.last_message_at))
    });

    let offset = ((page - 1) * limit).max(0) as usize;
    conversations.into_iter().skip(offset).take(limit.max(0) as usize).collect()
}
