//! HTTP handlers for the chat assistant

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use shared::models::ChatReply;
use shared::types::Pagination;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::chat::{ChatContext, ChatMessageRow};
use crate::AppState;

/// Input for sending a chat message
#[derive(Debug, Deserialize)]
pub struct SendMessageInput {
    pub message: String,
    #[serde(default)]
    pub context: ChatContext,
}

/// Query parameters for chat history
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Generate an assistant reply. Unlike the weather endpoints, failures
/// here surface to the caller.
pub async fn send_message(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<SendMessageInput>,
) -> AppResult<Json<ChatReply>> {
    if input.message.trim().is_empty() {
        return Err(AppError::Validation {
            field: "message".to_string(),
            message: "Message cannot be empty".to_string(),
        });
    }

    let reply = state
        .chat
        .generate_reply(Some(current_user.0.user_id), &input.message, &input.context)
        .await?;
    Ok(Json(reply))
}

/// Recent chat messages for the signed-in user, newest first
pub async fn get_chat_history(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Vec<ChatMessageRow>>> {
    let defaults = Pagination::default();
    let pagination = Pagination {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };

    let messages = state
        .chat
        .history(current_user.0.user_id, &pagination)
        .await?;
    Ok(Json(messages))
}
