use std::convert::Infallible;

use axum::Json;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue};
use axum::response::{IntoResponse, Response};
use futures::StreamExt;
use palaver_bedrock::anthropic::ModelRequest;
use palaver_bedrock::context::{ContextFile, assemble_prompt, to_model_messages};
use palaver_core::clock;
use palaver_core::models::message::{FileRef, Message, UploadedFile};
use palaver_core::models::stream_event::StreamEvent;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::relay::{self, EVENT_BUFFER, RelayOutcome};
use crate::routes::validate_json_body;
use crate::state::AppState;

const X_ACCEL_BUFFERING: HeaderName = HeaderName::from_static("x-accel-buffering");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub files: Option<Vec<UploadedFile>>,
    /// Older clients send bare base64 text documents.
    #[serde(default)]
    pub file_contents: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub response: String,
    pub conversation_id: String,
    pub timestamp: i64,
}

/// Everything a turn needs once the request has been read.
struct ChatTurn {
    user_id: String,
    conversation_id: String,
    history: Vec<Message>,
    user_message: Message,
    request: ModelRequest,
}

/// `POST /chat`: the reply as an NDJSON event stream.
pub async fn chat(
    State(state): State<AppState>,
    user: AuthUser,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request: ChatRequest = validate_json_body(&body, &["message"])?;
    let turn = prepare_turn(&state, user.sub, request).await?;

    let (tx, rx) = mpsc::channel(EVENT_BUFFER);
    tokio::spawn(async move {
        let outcome = relay::relay(
            state.model.as_ref(),
            &turn.request,
            &turn.conversation_id,
            &tx,
        )
        .await;

        // The body stays open until the save is done, so a Lambda
        // invocation is not frozen halfway through it.
        if let RelayOutcome::Completed(reply) = outcome {
            persist_turn(&state, turn, reply).await;
        }
    });

    let lines = ReceiverStream::new(rx).map(|event: StreamEvent| {
        let line = event.to_ndjson_line().unwrap_or_else(|e| {
            error!(error = %e, "failed to encode stream event");
            String::new()
        });
        Ok::<_, Infallible>(Bytes::from(line))
    });

    Ok((
        [
            (CONTENT_TYPE, HeaderValue::from_static("application/x-ndjson")),
            (CACHE_CONTROL, HeaderValue::from_static("no-cache")),
            (X_ACCEL_BUFFERING, HeaderValue::from_static("no")),
        ],
        Body::from_stream(lines),
    )
        .into_response())
}

/// `POST /chat/sync`: the whole reply in one JSON response.
pub async fn chat_sync(
    State(state): State<AppState>,
    user: AuthUser,
    body: Bytes,
) -> Result<Json<ChatReply>, ApiError> {
    let request: ChatRequest = validate_json_body(&body, &["message"])?;
    let turn = prepare_turn(&state, user.sub, request).await?;

    let response = state.model.invoke(&turn.request).await?;
    let conversation_id = turn.conversation_id.clone();
    persist_turn(&state, turn, response.clone()).await;

    Ok(Json(ChatReply {
        response,
        conversation_id,
        timestamp: clock::now_millis(),
    }))
}

async fn prepare_turn(
    state: &AppState,
    user_id: String,
    request: ChatRequest,
) -> Result<ChatTurn, ApiError> {
    let conversation_id = request
        .conversation_id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let history = state.store.history(&user_id, &conversation_id).await;

    let uploads = uploads_of(request.files, request.file_contents);
    let file_refs: Vec<FileRef> = uploads.iter().map(UploadedFile::file_ref).collect();
    let context_files = tokio::task::spawn_blocking(move || {
        uploads
            .iter()
            .map(|file| ContextFile {
                filename: file.file_name.clone(),
                text: palaver_extract::decode_upload(file),
            })
            .collect::<Vec<_>>()
    })
    .await?;

    let user_message = Message::user(request.message, clock::now_millis()).with_files(file_refs);
    let prompt = assemble_prompt(&history, &context_files, &user_message);

    info!(
        user_id = %user_id,
        conversation_id = %conversation_id,
        history = history.len(),
        files = context_files.len(),
        "prepared chat turn"
    );

    let request = ModelRequest::new(
        state.config.system_prompt.clone(),
        state.config.max_tokens,
        to_model_messages(&prompt),
    );

    Ok(ChatTurn {
        user_id,
        conversation_id,
        history,
        user_message,
        request,
    })
}

/// New-style uploads win; legacy contents are only read when there are none.
fn uploads_of(
    files: Option<Vec<UploadedFile>>,
    file_contents: Option<Vec<String>>,
) -> Vec<UploadedFile> {
    let files = files.unwrap_or_default();
    if !files.is_empty() {
        return files;
    }

    file_contents
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, content)| UploadedFile {
            file_name: format!("document_{}.txt", i + 1),
            file_type: "text/plain".to_string(),
            file_content: content,
        })
        .collect()
}

/// Save history + user message + reply. The file context message is not
/// stored. Failures are logged; the client already has its answer.
async fn persist_turn(state: &AppState, turn: ChatTurn, reply: String) {
    if reply.is_empty() {
        warn!(
            conversation_id = %turn.conversation_id,
            "empty model reply, conversation not saved"
        );
        return;
    }

    let mut messages = turn.history;
    messages.push(turn.user_message);
    messages.push(Message::assistant(reply, clock::now_millis()));

    if let Err(e) = state
        .store
        .put(&turn.user_id, &turn.conversation_id, &messages)
        .await
    {
        error!(
            function = "persist_turn",
            user_id = %turn.user_id,
            conversation_id = %turn.conversation_id,
            error = %e,
            "failed to save conversation"
        );
    }
}
