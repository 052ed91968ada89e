use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;
use palaver_core::models::conversation::ConversationRecord;
use palaver_core::models::message::Message;
use palaver_core::store_keys::{self, CONVERSATION_ID, USER_ID};
use serde_dynamo::aws_sdk_dynamodb_1::{from_item, from_items, to_item};
use tracing::{debug, info};

use crate::error::StorageError;
use crate::store::{ConversationStore, Lookup, new_record};

/// Conversation table keyed by `user_id` (partition) and `conversation_id`
/// (sort).
#[derive(Clone)]
pub struct DynamoConversationStore {
    client: Client,
    table: String,
    history_limit: usize,
}

impl DynamoConversationStore {
    pub fn new(client: Client, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
            history_limit: store_keys::DEFAULT_HISTORY_LIMIT,
        }
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    fn key(user_id: &str, conversation_id: &str) -> HashMap<String, AttributeValue> {
        HashMap::from([
            (USER_ID.to_string(), AttributeValue::S(user_id.to_string())),
            (
                CONVERSATION_ID.to_string(),
                AttributeValue::S(conversation_id.to_string()),
            ),
        ])
    }
}

#[async_trait]
impl ConversationStore for DynamoConversationStore {
    async fn lookup(&self, user_id: &str, conversation_id: &str) -> Result<Lookup, StorageError> {
        let resp = self
            .client
            .get_item()
            .table_name(&self.table)
            .set_key(Some(Self::key(user_id, conversation_id)))
            .send()
            .await
            .map_err(|e| StorageError::GetItem(e.into_service_error().to_string()))?;

        let Some(item) = resp.item else {
            debug!(user_id, conversation_id, "conversation not found");
            return Ok(Lookup::NotFound);
        };

        let record: ConversationRecord = from_item(item)?;
        Ok(Lookup::Found(record.messages))
    }

    async fn put(
        &self,
        user_id: &str,
        conversation_id: &str,
        messages: &[Message],
    ) -> Result<(), StorageError> {
        let record = new_record(user_id, conversation_id, messages, self.history_limit);
        let item = to_item(&record)?;

        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| StorageError::PutItem(e.into_service_error().to_string()))?;

        info!(
            user_id,
            conversation_id,
            messages = record.messages.len(),
            "saved conversation"
        );
        Ok(())
    }

    async fn delete(&self, user_id: &str, conversation_id: &str) -> Result<(), StorageError> {
        self.client
            .delete_item()
            .table_name(&self.table)
            .set_key(Some(Self::key(user_id, conversation_id)))
            .send()
            .await
            .map_err(|e| StorageError::DeleteItem(e.into_service_error().to_string()))?;

        info!(user_id, conversation_id, "deleted conversation");
        Ok(())
    }

    async fn list(&self, user_id: &str) -> Result<Vec<ConversationRecord>, StorageError> {
        let mut records = Vec::new();
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;

        loop {
            let resp = self
                .client
                .query()
                .table_name(&self.table)
                .key_condition_expression("#uid = :uid")
                .expression_attribute_names("#uid", USER_ID)
                .expression_attribute_values(":uid", AttributeValue::S(user_id.to_string()))
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| StorageError::Query(e.into_service_error().to_string()))?;

            if let Some(items) = resp.items {
                let page: Vec<ConversationRecord> = from_items(items)?;
                records.extend(page);
            }

            match resp.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        debug!(user_id, count = records.len(), "listed conversations");
        Ok(records)
    }
}
