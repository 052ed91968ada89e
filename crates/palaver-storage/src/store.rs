use async_trait::async_trait;
use palaver_core::clock;
use palaver_core::models::conversation::ConversationRecord;
use palaver_core::models::message::{Message, Role};
use palaver_core::store_keys;
use tracing::error;

use crate::error::StorageError;

/// Outcome of reading one conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(Vec<Message>),
    NotFound,
}

impl Lookup {
    pub fn into_messages(self) -> Vec<Message> {
        match self {
            Lookup::Found(messages) => messages,
            Lookup::NotFound => Vec::new(),
        }
    }
}

/// Per-user conversation persistence. Saves are whole-record overwrites,
/// last writer wins.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn lookup(&self, user_id: &str, conversation_id: &str) -> Result<Lookup, StorageError>;

    /// Overwrite the conversation with (the recent window of) `messages`.
    async fn put(
        &self,
        user_id: &str,
        conversation_id: &str,
        messages: &[Message],
    ) -> Result<(), StorageError>;

    async fn delete(&self, user_id: &str, conversation_id: &str) -> Result<(), StorageError>;

    /// Every conversation of a user, in store order.
    async fn list(&self, user_id: &str) -> Result<Vec<ConversationRecord>, StorageError>;

    /// Prior messages of a conversation. A chat turn must not fail because
    /// history could not be read, so backend errors degrade to no history.
    async fn history(&self, user_id: &str, conversation_id: &str) -> Vec<Message> {
        match self.lookup(user_id, conversation_id).await {
            Ok(lookup) => lookup.into_messages(),
            Err(e) => {
                error!(
                    function = "history",
                    user_id,
                    conversation_id,
                    error = %e,
                    "failed to load conversation history"
                );
                Vec::new()
            }
        }
    }
}

/// The trailing `limit` messages, minus any leading assistant messages so the
/// saved history always opens with a user turn.
pub fn history_window(messages: &[Message], limit: usize) -> &[Message] {
    let window = store_keys::recent_window(messages, limit);
    let start = window
        .iter()
        .position(|m| m.role == Role::User)
        .unwrap_or(window.len());
    &window[start..]
}

/// The record written for a save happening now.
pub fn new_record(
    user_id: &str,
    conversation_id: &str,
    messages: &[Message],
    history_limit: usize,
) -> ConversationRecord {
    ConversationRecord {
        user_id: user_id.to_string(),
        conversation_id: conversation_id.to_string(),
        messages: history_window(messages, history_limit).to_vec(),
        timestamp: clock::now_millis(),
        ttl: store_keys::ttl_from(clock::now_seconds()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_is_windowed_and_expires_later() {
        let messages: Vec<Message> = (0..25).map(|i| Message::user(format!("m{i}"), i)).collect();
        let record = new_record("u", "c", &messages, 20);

        assert_eq!(record.messages.len(), 20);
        assert_eq!(record.messages[0].content, "m5");
        let horizon = record.ttl - record.timestamp / 1000;
        assert!((horizon - 90 * 24 * 60 * 60).abs() <= 1);
    }

    #[test]
    fn odd_window_never_opens_with_assistant() {
        let messages = vec![
            Message::user("q1", 1),
            Message::assistant("a1", 2),
            Message::user("q2", 3),
            Message::assistant("a2", 4),
        ];

        let kept: Vec<&str> = history_window(&messages, 3)
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(kept, vec!["q2", "a2"]);

        let record = new_record("u", "c", &messages, 3);
        assert_eq!(record.messages[0].role, Role::User);
        assert_eq!(record.messages.len(), 2);
    }

    #[test]
    fn not_found_has_no_messages() {
        assert!(Lookup::NotFound.into_messages().is_empty());
    }
}
