use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A single message in a persisted conversation.
///
/// Stored verbatim inside the conversation record, so the field names are
/// part of the stored-data contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Unix milliseconds.
    #[ts(type = "number")]
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub files: Option<Vec<FileRef>>,
}

impl Message {
    pub fn user(content: impl Into<String>, timestamp: i64) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp,
            files: None,
        }
    }

    pub fn assistant(content: impl Into<String>, timestamp: i64) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp,
            files: None,
        }
    }

    /// Attach file metadata. An empty list is stored as no files at all.
    pub fn with_files(mut self, files: Vec<FileRef>) -> Self {
        self.files = if files.is_empty() { None } else { Some(files) };
        self
    }
}

/// Speaker of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Metadata of a file attached to a user message. Never the bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FileRef {
    pub name: String,
    #[serde(rename = "type")]
    pub file_type: String,
}

/// A file uploaded with a chat request. Lives for one request only.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UploadedFile {
    pub file_name: String,
    pub file_type: String,
    /// Base64-encoded file bytes.
    pub file_content: String,
}

impl UploadedFile {
    pub fn file_ref(&self) -> FileRef {
        FileRef {
            name: self.file_name.clone(),
            file_type: self.file_type.clone(),
        }
    }
}
