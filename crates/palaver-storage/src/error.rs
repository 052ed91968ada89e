use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("item serialization error: {0}")]
    Serialization(#[from] serde_dynamo::Error),

    #[error("DynamoDB GetItem error: {0}")]
    GetItem(String),

    #[error("DynamoDB PutItem error: {0}")]
    PutItem(String),

    #[error("DynamoDB DeleteItem error: {0}")]
    DeleteItem(String),

    #[error("DynamoDB Query error: {0}")]
    Query(String),
}
