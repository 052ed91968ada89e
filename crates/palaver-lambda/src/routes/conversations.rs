use axum::Json;
use axum::extract::{Path, State};
use palaver_core::models::conversation::{ConversationSummary, summarize};
use palaver_core::models::message::Message;
use serde::Serialize;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ConversationList {
    pub conversations: Vec<ConversationSummary>,
    pub count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationDetail {
    pub conversation_id: String,
    pub messages: Vec<Message>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deleted {
    pub success: bool,
    pub conversation_id: String,
}

pub async fn list_conversations(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ConversationList>, ApiError> {
    let records = state.store.list(&user.sub).await?;
    let conversations = summarize(&records);

    Ok(Json(ConversationList {
        count: conversations.len(),
        conversations,
    }))
}

pub async fn get_conversation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Json<ConversationDetail> {
    let messages = state.store.history(&user.sub, &id).await;
    Json(ConversationDetail {
        conversation_id: id,
        messages,
    })
}

pub async fn delete_conversation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, ApiError> {
    state.store.delete(&user.sub, &id).await?;
    Ok(Json(Deleted {
        success: true,
        conversation_id: id,
    }))
}
