//! palaver-storage
//!
//! Conversation persistence. A DynamoDB-backed store for deployments and an
//! in-memory one for local runs and tests, both behind [`store::ConversationStore`].

pub mod client;
pub mod dynamo;
pub mod error;
pub mod memory;
pub mod store;
