use crate::domain::message::MessageWithSender;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

/// Which side of a conversation a user sits on. The client is always the
/// user who posted the task; the worker is the counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Client,
    Worker,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: Uuid,
    pub task_id: Uuid,
    pub client_id: Uuid,
    pub worker_id: Uuid,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_message_at: Option<OffsetDateTime>,
    pub client_pinned: bool,
    pub worker_pinned: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Conversation {
    #[must_use]
    pub fn role_of(&self, user_id: Uuid) -> Option<Role> {
        if user_id == self.client_id {
            Some(Role::Client)
        } else if user_id == self.worker_id {
            Some(Role::Worker)
        } else {
            None
        }
    }

    #[must_use]
    pub fn is_participant(&self, user_id: Uuid) -> bool {
        self.role_of(user_id).is_some()
    }

    /// Pin state is private to each side of the conversation.
    #[must_use]
    pub fn is_pinned_for(&self, user_id: Uuid) -> bool {
        match self.role_of(user_id) {
            Some(Role::Client) => self.client_pinned,
            Some(Role::Worker) => self.worker_pinned,
            None => false,
        }
    }
}

/// Derives the canonical (client, worker) pair for a conversation. The role
/// depends only on which side posted the task, never on who initiated.
#[must_use]
pub fn derive_roles(poster_id: Uuid, requester_id: Uuid, recipient_id: Uuid) -> (Uuid, Uuid) {
    if requester_id == poster_id { (requester_id, recipient_id) } else { (recipient_id, requester_id) }
}

/// A conversation as seen by one participant: the shared row plus the
/// viewer-relative pin flag.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationView {
    #[serde(flatten)]
    pub conversation: Conversation,
    pub is_pinned: bool,
}

impl ConversationView {
    #[must_use]
    pub fn for_viewer(conversation: Conversation, viewer_id: Uuid) -> Self {
        let is_pinned = conversation.is_pinned_for(viewer_id);
        Self { conversation, is_pinned }
    }
}

/// A chat-list entry: the viewer's conversation view plus the most recent
/// message and the viewer's unread count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    #[serde(flatten)]
    pub view: ConversationView,
    pub unread_count: i64,
    pub last_message: Option<MessageWithSender>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation(client_id: Uuid, worker_id: Uuid) -> Conversation {
        Conversation {
            id: Uuid::new_v4(),
            task_id: Uuid::new_v4(),
            client_id,
            worker_id,
            last_message_at: None,
            client_pinned: false,
            worker_pinned: false,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn role_depends_only_on_poster() {
        let poster = Uuid::new_v4();
        let other = Uuid::new_v4();

        // Poster starts the conversation.
        assert_eq!(derive_roles(poster, poster, other), (poster, other));
        // Counterpart starts it; roles come out the same way around.
        assert_eq!(derive_roles(poster, other, poster), (poster, other));
    }

    #[test]
    fn pin_flags_are_per_side() {
        let client = Uuid::new_v4();
        let worker = Uuid::new_v4();
        let mut conv = conversation(client, worker);
        conv.client_pinned = true;

        assert!(conv.is_pinned_for(client));
        assert!(!conv.is_pinned_for(worker));
        assert!(!conv.is_pinned_for(Uuid::new_v4()));
    }

    #[test]
    fn outsiders_have_no_role() {
        let conv = conversation(Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(conv.role_of(Uuid::new_v4()), None);
        assert!(!conv.is_participant(Uuid::new_v4()));
    }
}
