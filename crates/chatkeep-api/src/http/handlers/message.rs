//! Message submission handler.
//!
//! POST /message appends the caller's message to a conversation, creating
//! the conversation when no id (or an unseen id) is given.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use chatkeep_types::conversation::{Message, MessageRole};
use chatkeep_types::timestamp::to_epoch_seconds;

use crate::http::error::AppError;
use crate::http::extractors::auth::CallerToken;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub token: Option<String>,
    pub message: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub conversation_id: String,
    pub created: bool,
}

/// POST /message - Append a user message to a conversation.
pub async fn send_message(
    State(state): State<AppState>,
    caller: CallerToken,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<ApiResponse<SendMessageResponse>, AppError> {
    let Json(body) = payload?;
    let user = state
        .identity_service
        .require(caller.or_body(body.token).as_deref())
        .await?;

    let message = Message {
        role: MessageRole::User,
        content: body.message,
        timestamp: Some(to_epoch_seconds(&Utc::now())),
    };

    let outcome = state
        .conversation_service
        .append_message(user.id, body.conversation_id.as_deref(), message)
        .await?;

    Ok(ApiResponse::success(SendMessageResponse {
        conversation_id: outcome.conversation_id,
        created: outcome.created,
    }))
}
