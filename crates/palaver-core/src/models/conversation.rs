use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::message::Message;

/// Maximum number of characters kept in a conversation preview.
pub const PREVIEW_CHARS: usize = 100;

/// One conversation as persisted in the conversation table.
///
/// Keyed by `(user_id, conversation_id)` and overwritten wholesale on
/// every save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub user_id: String,
    pub conversation_id: String,
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Unix milliseconds of the last save.
    #[serde(default)]
    pub timestamp: i64,
    /// Unix seconds after which the table may expire the record.
    #[serde(default)]
    pub ttl: i64,
}

/// Listing entry returned by `GET /conversations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ConversationSummary {
    pub conversation_id: String,
    #[ts(type = "number")]
    pub timestamp: i64,
    pub message_count: usize,
    pub preview: String,
}

impl ConversationSummary {
    /// Project a stored record. Records without messages have nothing to
    /// preview and are not listed.
    pub fn from_record(record: &ConversationRecord) -> Option<Self> {
        let first = record.messages.first()?;
        Some(Self {
            conversation_id: record.conversation_id.clone(),
            timestamp: record.timestamp,
            message_count: record.messages.len(),
            preview: first.content.chars().take(PREVIEW_CHARS).collect(),
        })
    }
}

/// Summaries of a user's conversations, most recent first.
pub fn summarize(records: &[ConversationRecord]) -> Vec<ConversationSummary> {
    let mut summaries: Vec<ConversationSummary> = records
        .iter()
        .filter_map(ConversationSummary::from_record)
        .collect();
    summaries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    summaries
}
