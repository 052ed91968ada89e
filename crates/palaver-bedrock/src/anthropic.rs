//! Anthropic Messages wire format as accepted by Bedrock `InvokeModel`.

use palaver_core::models::message::Message;
use serde::{Deserialize, Serialize};

use crate::error::BedrockError;

pub const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelRequest {
    pub anthropic_version: &'static str,
    pub max_tokens: u32,
    pub messages: Vec<ModelMessage>,
    pub system: String,
}

impl ModelRequest {
    pub fn new(system: impl Into<String>, max_tokens: u32, messages: Vec<ModelMessage>) -> Self {
        Self {
            anthropic_version: ANTHROPIC_VERSION,
            max_tokens,
            messages,
            system: system.into(),
        }
    }
}

/// What the model sees of a message: role and content only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelMessage {
    pub role: &'static str,
    pub content: String,
}

impl From<&Message> for ModelMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role.as_str(),
            content: message.content.clone(),
        }
    }
}

/// Blocking `InvokeModel` response body.
#[derive(Debug, Deserialize)]
pub struct ModelResponse {
    #[serde(default)]
    pub content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
pub struct ContentPart {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl ModelResponse {
    pub fn parse(body: &[u8]) -> Result<Self, BedrockError> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Concatenated text blocks.
    pub fn text(&self) -> Result<String, BedrockError> {
        if self.content.is_empty() {
            return Err(BedrockError::ResponseParse("no content in response".to_string()));
        }
        Ok(self
            .content
            .iter()
            .filter(|part| part.kind == "text")
            .filter_map(|part| part.text.as_deref())
            .collect())
    }
}

/// One streamed chunk. Only text deltas matter; everything else is skipped.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamChunk {
    ContentBlockDelta {
        delta: Delta,
    },
    Error {
        #[serde(default)]
        error: serde_json::Value,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct Delta {
    #[serde(default)]
    text: Option<String>,
}

/// Text carried by a streamed chunk payload, if any.
pub fn delta_text(payload: &[u8]) -> Result<Option<String>, BedrockError> {
    let chunk: StreamChunk = serde_json::from_slice(payload)
        .map_err(|e| BedrockError::ResponseParse(format!("malformed stream chunk: {e}")))?;

    match chunk {
        StreamChunk::ContentBlockDelta { delta } => Ok(delta.text.filter(|t| !t.is_empty())),
        StreamChunk::Error { error } => Err(BedrockError::Model(error.to_string())),
        StreamChunk::Other => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn request_body_shape() {
        let request = ModelRequest::new(
            "be nice",
            4000,
            vec![ModelMessage::from(&Message::user("hi", 1))],
        );
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "anthropic_version": "bedrock-2023-05-31",
                "max_tokens": 4000,
                "messages": [{ "role": "user", "content": "hi" }],
                "system": "be nice"
            })
        );
    }

    #[test]
    fn text_deltas_are_extracted() {
        let payload = br#"{"type":"content_block_delta","index":0,"delta":{"type":"text_delta","text":"Hel"}}"#;
        assert_eq!(delta_text(payload).unwrap(), Some("Hel".to_string()));
    }

    #[test]
    fn other_chunk_types_are_ignored() {
        for payload in [
            r#"{"type":"message_start","message":{"id":"m"}}"#,
            r#"{"type":"content_block_start","index":0,"content_block":{"type":"text","text":""}}"#,
            r#"{"type":"content_block_stop","index":0}"#,
            r#"{"type":"message_delta","delta":{"stop_reason":"end_turn"}}"#,
            r#"{"type":"message_stop"}"#,
        ] {
            assert_eq!(delta_text(payload.as_bytes()).unwrap(), None, "{payload}");
        }
    }

    #[test]
    fn delta_without_text_is_ignored() {
        let payload = br#"{"type":"content_block_delta","delta":{"type":"input_json_delta","partial_json":"{"}}"#;
        assert_eq!(delta_text(payload).unwrap(), None);
    }

    #[test]
    fn malformed_chunk_is_an_error() {
        assert!(matches!(
            delta_text(b"not json"),
            Err(BedrockError::ResponseParse(_))
        ));
    }

    #[test]
    fn error_chunk_is_an_error() {
        let payload = br#"{"type":"error","error":{"type":"overloaded_error","message":"busy"}}"#;
        assert!(matches!(delta_text(payload), Err(BedrockError::Model(_))));
    }

    #[test]
    fn blocking_response_joins_text_blocks() {
        let body = br#"{"id":"x","content":[{"type":"text","text":"Hello "},{"type":"text","text":"world"}],"stop_reason":"end_turn"}"#;
        assert_eq!(ModelResponse::parse(body).unwrap().text().unwrap(), "Hello world");
    }

    #[test]
    fn blocking_response_without_content_fails() {
        let body = br#"{"content":[]}"#;
        assert!(ModelResponse::parse(body).unwrap().text().is_err());
    }
}
