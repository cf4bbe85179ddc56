use crate::config::WsConfig;
use crate::domain::conversation::ConversationView;
use crate::domain::message::Message;
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::Instrument;
use uuid::Uuid;

/// Server-to-client events. `message:new` goes to the conversation room (for
/// users viewing the thread) while `conversation:newMessage` goes to each
/// participant's personal channel (for chat-list badges); the names differ so
/// a client listening on both does not render the message twice.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    #[serde(rename = "message:new")]
    MessageNew { conversation_id: Uuid, message: Message },
    #[serde(rename = "conversation:newMessage")]
    ConversationNewMessage { conversation_id: Uuid, last_message: Message, sender_id: Uuid },
    #[serde(rename = "message:read")]
    MessageRead { conversation_id: Uuid, message_ids: Vec<Uuid>, read_by: Uuid },
    #[serde(rename = "conversation:update")]
    ConversationUpdate { conversation: ConversationView },
    #[serde(rename = "typing:start")]
    TypingStart { conversation_id: Uuid, user_id: Uuid },
    #[serde(rename = "typing:stop")]
    TypingStop { conversation_id: Uuid, user_id: Uuid },
}

/// Fan-out seam injected into the services at construction. Delivery is
/// at-most-once and fire-and-forget: no queueing, no retry, no error
/// propagation to the operation that triggered the emit. A reconnecting
/// client reconciles by refetching, not by replaying missed events.
pub trait Notifier: Send + Sync + std::fmt::Debug {
    fn emit_to_user(&self, user_id: Uuid, event: ServerEvent);
    fn emit_to_room(&self, conversation_id: Uuid, event: ServerEvent);
}

/// In-process notifier: one broadcast channel per connected user and per
/// joined conversation room, with a periodic sweep of channels nobody
/// subscribes to anymore.
#[derive(Debug)]
pub struct ChannelNotifier {
    users: DashMap<Uuid, broadcast::Sender<ServerEvent>>,
    rooms: DashMap<Uuid, broadcast::Sender<ServerEvent>>,
    channel_capacity: usize,
}

impl ChannelNotifier {
    #[must_use]
    pub fn new(config: &WsConfig) -> Arc<Self> {
        Arc::new(Self { users: DashMap::new(), rooms: DashMap::new(), channel_capacity: config.channel_capacity })
    }

    /// Spawns the channel garbage collector.
    pub fn spawn_gc(self: &Arc<Self>, interval_secs: u64, mut shutdown: watch::Receiver<bool>) {
        let notifier = Arc::clone(self);
        tokio::spawn(
            async move {
                let mut interval = tokio::time::interval(std::time::Duration::from_secs(interval_secs));
                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            notifier.users.retain(|_, tx| tx.receiver_count() > 0);
                            notifier.rooms.retain(|_, tx| tx.receiver_count() > 0);
                        }
                        _ = shutdown.changed() => break,
                    }
                }
            }
            .instrument(tracing::info_span!("notifier_gc")),
        );
    }

    pub fn subscribe_user(&self, user_id: Uuid) -> broadcast::Receiver<ServerEvent> {
        self.users
            .entry(user_id)
            .or_insert_with(|| broadcast::channel(self.channel_capacity).0)
            .value()
            .subscribe()
    }

    pub fn subscribe_room(&self, conversation_id: Uuid) -> broadcast::Receiver<ServerEvent> {
        self.rooms
            .entry(conversation_id)
            .or_insert_with(|| broadcast::channel(self.channel_capacity).0)
            .value()
            .subscribe()
    }
}

impl Notifier for ChannelNotifier {
    fn emit_to_user(&self, user_id: Uuid, event: ServerEvent) {
        if let Some(tx) = self.users.get(&user_id) {
            // A send error just means the user has no live connection.
            let _ = tx.send(event);
        }
    }

    fn emit_to_room(&self, conversation_id: Uuid, event: ServerEvent) {
        if let Some(tx) = self.rooms.get(&conversation_id) {
            let _ = tx.send(event);
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::sync::Mutex;

    /// Records emits instead of delivering them.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingNotifier {
        pub(crate) user_events: Mutex<Vec<(Uuid, ServerEvent)>>,
        pub(crate) room_events: Mutex<Vec<(Uuid, ServerEvent)>>,
    }

    impl Notifier for RecordingNotifier {
        fn emit_to_user(&self, user_id: Uuid, event: ServerEvent) {
            self.user_events.lock().expect("poisoned").push((user_id, event));
        }

        fn emit_to_room(&self, conversation_id: Uuid, event: ServerEvent) {
            self.room_events.lock().expect("poisoned").push((conversation_id, event));
        }
    }
}
