use std::collections::HashMap;

use async_trait::async_trait;
use palaver_core::models::conversation::ConversationRecord;
use palaver_core::models::message::Message;
use palaver_core::store_keys;
use tokio::sync::Mutex;

use crate::error::StorageError;
use crate::store::{ConversationStore, Lookup, new_record};

/// Process-local store. Nothing survives a restart.
pub struct MemoryConversationStore {
    records: Mutex<HashMap<(String, String), ConversationRecord>>,
    history_limit: usize,
}

impl MemoryConversationStore {
    pub fn new() -> Self {
        Self::with_history_limit(store_keys::DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_history_limit(history_limit: usize) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            history_limit,
        }
    }

    /// Insert a record as-is, bypassing the save-time window and clock.
    pub async fn insert_record(&self, record: ConversationRecord) {
        let key = (record.user_id.clone(), record.conversation_id.clone());
        self.records.lock().await.insert(key, record);
    }
}

impl Default for MemoryConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

fn key(user_id: &str, conversation_id: &str) -> (String, String) {
    (user_id.to_string(), conversation_id.to_string())
}

#[async_trait]
impl ConversationStore for MemoryConversationStore {
    async fn lookup(&self, user_id: &str, conversation_id: &str) -> Result<Lookup, StorageError> {
        let records = self.records.lock().await;
        Ok(match records.get(&key(user_id, conversation_id)) {
            Some(record) => Lookup::Found(record.messages.clone()),
            None => Lookup::NotFound,
        })
    }

    async fn put(
        &self,
        user_id: &str,
        conversation_id: &str,
        messages: &[Message],
    ) -> Result<(), StorageError> {
        let record = new_record(user_id, conversation_id, messages, self.history_limit);
        self.insert_record(record).await;
        Ok(())
    }

    async fn delete(&self, user_id: &str, conversation_id: &str) -> Result<(), StorageError> {
        self.records
            .lock()
            .await
            .remove(&key(user_id, conversation_id));
        Ok(())
    }

    async fn list(&self, user_id: &str) -> Result<Vec<ConversationRecord>, StorageError> {
        let records = self.records.lock().await;
        Ok(records
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }
}
