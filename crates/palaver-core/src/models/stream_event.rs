use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// One line of the `/chat` NDJSON response.
///
/// A successful stream is `start`, zero or more `chunk`s, then `end`. A
/// failed stream ends with a single `error` instead of `end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export)]
pub enum StreamEvent {
    Start {
        #[serde(rename = "conversationId")]
        conversation_id: String,
        #[ts(type = "number")]
        timestamp: i64,
    },
    Chunk {
        content: String,
    },
    End {
        #[ts(type = "number")]
        timestamp: i64,
    },
    Error {
        content: String,
    },
}

impl StreamEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::End { .. } | StreamEvent::Error { .. })
    }

    /// Serialize as a single NDJSON line, trailing newline included.
    pub fn to_ndjson_line(&self) -> Result<String, CoreError> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_event_wire_format() {
        let event = StreamEvent::Start {
            conversation_id: "abc".to_string(),
            timestamp: 1700,
        };
        assert_eq!(
            event.to_ndjson_line().unwrap(),
            "{\"type\":\"start\",\"conversationId\":\"abc\",\"timestamp\":1700}\n"
        );
    }

    #[test]
    fn chunk_and_error_carry_content() {
        let chunk = serde_json::to_value(StreamEvent::Chunk {
            content: "Hel".to_string(),
        })
        .unwrap();
        assert_eq!(chunk, serde_json::json!({ "type": "chunk", "content": "Hel" }));

        let error = serde_json::to_value(StreamEvent::Error {
            content: "boom".to_string(),
        })
        .unwrap();
        assert_eq!(error, serde_json::json!({ "type": "error", "content": "boom" }));
    }

    #[test]
    fn chunk_content_with_newlines_stays_on_one_line() {
        let line = StreamEvent::Chunk {
            content: "a\nb".to_string(),
        }
        .to_ndjson_line()
        .unwrap();
        assert_eq!(line.matches('\n').count(), 1);
        assert!(line.ends_with('\n'));
    }

    #[test]
    fn only_end_and_error_are_terminal() {
        assert!(StreamEvent::End { timestamp: 1 }.is_terminal());
        assert!(StreamEvent::Error { content: String::new() }.is_terminal());
        assert!(!StreamEvent::Chunk { content: String::new() }.is_terminal());
    }
}
