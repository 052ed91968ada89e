//! Prompt assembly for a chat turn.
//!
//! Extracted upload text travels to the model as one synthetic user message
//! placed just before the user's own message. It is never persisted; only
//! the file metadata on the user message is.

use palaver_core::models::message::Message;

use crate::anthropic::ModelMessage;

/// An uploaded file with its extracted text content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextFile {
    pub filename: String,
    pub text: String,
}

/// Build the file context message body.
///
/// If `files` is empty, returns an empty string (no context to inject).
pub fn build_context_block(files: &[ContextFile]) -> String {
    if files.is_empty() {
        return String::new();
    }

    let blocks: Vec<String> = files
        .iter()
        .map(|file| format!("<file name='{}'>\n{}\n</file>", file.filename, file.text))
        .collect();

    format!("Here are the files provided as context:\n\n{}", blocks.join("\n"))
}

/// Messages sent to the model for one turn: the stored history, then the
/// file context (if any, timestamped 1ms before the user message), then the
/// user message.
pub fn assemble_prompt(
    history: &[Message],
    files: &[ContextFile],
    user_message: &Message,
) -> Vec<Message> {
    let mut messages = history.to_vec();

    if !files.is_empty() {
        messages.push(Message::user(
            build_context_block(files),
            user_message.timestamp - 1,
        ));
    }

    messages.push(user_message.clone());
    messages
}

pub fn to_model_messages(messages: &[Message]) -> Vec<ModelMessage> {
    messages.iter().map(ModelMessage::from).collect()
}
