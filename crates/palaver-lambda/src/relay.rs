//! Streams one model reply to the client as NDJSON events.
//!
//! `Start -> Streaming -> End`, with `Error` reachable from `Start` and
//! `Streaming`. Every fragment is forwarded as its own `chunk` event, in
//! arrival order. The relay never stops early because the client went away:
//! send failures are ignored so the reply can still be persisted.

use futures::StreamExt;
use palaver_bedrock::anthropic::ModelRequest;
use palaver_bedrock::client::{ModelInvoker, TextStream};
use palaver_core::clock;
use palaver_core::models::stream_event::StreamEvent;
use tokio::sync::mpsc::Sender;
use tracing::{debug, error};

/// Events buffered between the relay task and the response body.
pub const EVENT_BUFFER: usize = 64;

enum RelayState {
    Start,
    Streaming(TextStream),
    End,
    Error(String),
}

/// How a relayed reply finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// `end` was emitted; carries the assembled reply.
    Completed(String),
    /// `error` was emitted; carries the cause.
    Failed(String),
}

pub async fn relay(
    model: &dyn ModelInvoker,
    request: &ModelRequest,
    conversation_id: &str,
    events: &Sender<StreamEvent>,
) -> RelayOutcome {
    let mut response = String::new();
    let mut state = RelayState::Start;

    loop {
        state = match state {
            RelayState::Start => {
                emit(
                    events,
                    StreamEvent::Start {
                        conversation_id: conversation_id.to_string(),
                        timestamp: clock::now_millis(),
                    },
                )
                .await;

                match model.invoke_stream(request).await {
                    Ok(fragments) => RelayState::Streaming(fragments),
                    Err(e) => RelayState::Error(e.to_string()),
                }
            }
            RelayState::Streaming(mut fragments) => match fragments.next().await {
                Some(Ok(text)) => {
                    response.push_str(&text);
                    emit(events, StreamEvent::Chunk { content: text }).await;
                    RelayState::Streaming(fragments)
                }
                Some(Err(e)) => RelayState::Error(e.to_string()),
                None => RelayState::End,
            },
            RelayState::End => {
                emit(
                    events,
                    StreamEvent::End {
                        timestamp: clock::now_millis(),
                    },
                )
                .await;
                return RelayOutcome::Completed(response);
            }
            RelayState::Error(cause) => {
                error!(function = "relay", conversation_id, error = %cause, "model stream failed");
                emit(
                    events,
                    StreamEvent::Error {
                        content: format!("Error calling Claude: {cause}"),
                    },
                )
                .await;
                return RelayOutcome::Failed(cause);
            }
        };
    }
}

async fn emit(events: &Sender<StreamEvent>, event: StreamEvent) {
    if events.send(event).await.is_err() {
        debug!("client disconnected, continuing without it");
    }
}
