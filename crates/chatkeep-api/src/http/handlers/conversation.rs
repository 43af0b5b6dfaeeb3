//! Conversation history HTTP handlers.
//!
//! Endpoints:
//! - GET    /conversations        - List (or fetch one with `?id=`)
//! - DELETE /conversations?id=    - Delete one conversation
//! - POST   /conversations/clear  - Delete all of the caller's conversations

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use chatkeep_core::service::conversation::ConversationQuery;
use chatkeep_types::error::ConversationError;
use chatkeep_types::timestamp::from_epoch_seconds;

use crate::http::error::AppError;
use crate::http::extractors::auth::CallerToken;
use crate::http::handlers::auth::TokenBody;
use crate::http::response::{ApiResponse, ConversationView, Empty, SummaryView};
use crate::state::AppState;

/// Query parameters for GET /conversations.
///
/// `start_date` and `end_date` are epoch seconds, both inclusive.
#[derive(Debug, Default, Deserialize)]
pub struct ConversationParams {
    pub id: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub keyword: Option<String>,
    pub start_date: Option<f64>,
    pub end_date: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct IdParam {
    pub id: Option<String>,
}

/// Page window echoed back with a listing.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Pagination {
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
}

/// A listing carries the window both flattened and as `pagination`.
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub data: Vec<SummaryView>,
    #[serde(flatten)]
    pub window: Pagination,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct DetailResponse {
    pub data: ConversationView,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub deleted: u64,
}

fn epoch_param(name: &str, value: Option<f64>) -> Result<Option<DateTime<Utc>>, AppError> {
    value
        .map(|secs| {
            from_epoch_seconds(secs)
                .ok_or_else(|| AppError::Validation(format!("{name} is not a valid timestamp")))
        })
        .transpose()
}

/// GET /conversations - List the caller's conversations, or fetch one by id.
pub async fn get_conversations(
    State(state): State<AppState>,
    caller: CallerToken,
    params: Result<Query<ConversationParams>, QueryRejection>,
) -> Result<Response, AppError> {
    let user = state.identity_service.require(caller.as_deref()).await?;
    let Query(params) = params?;

    if let Some(id) = params.id.as_deref().filter(|id| !id.is_empty()) {
        let conversation = state
            .conversation_service
            .get_conversation(id, user.id)
            .await?
            .ok_or(ConversationError::NotFoundOrForbidden)?;

        return Ok(ApiResponse::success(DetailResponse {
            data: conversation.into(),
        })
        .into_response());
    }

    let query = ConversationQuery {
        limit: params.limit,
        offset: params.offset.unwrap_or(0),
        start_time: epoch_param("start_date", params.start_date)?,
        end_time: epoch_param("end_date", params.end_date)?,
        keyword: params.keyword,
    };

    let page = state
        .conversation_service
        .list_conversations(user.id, &query)
        .await?;

    let window = Pagination {
        total: page.total,
        limit: page.limit,
        offset: page.offset,
    };

    Ok(ApiResponse::success(ListResponse {
        data: page.items.into_iter().map(SummaryView::from).collect(),
        window,
        pagination: window,
    })
    .into_response())
}

/// DELETE /conversations?id= - Delete one of the caller's conversations.
///
/// Unknown ids and ids owned by others succeed without effect.
pub async fn delete_conversation(
    State(state): State<AppState>,
    caller: CallerToken,
    params: Result<Query<IdParam>, QueryRejection>,
) -> Result<ApiResponse<Empty>, AppError> {
    let user = state.identity_service.require(caller.as_deref()).await?;
    let Query(params) = params?;

    let id = params
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::Validation("id is required".to_string()))?;

    state
        .conversation_service
        .delete_conversation(&id, user.id)
        .await?;

    Ok(ApiResponse::ok())
}

/// POST /conversations/clear - Delete all of the caller's conversations.
pub async fn clear_conversations(
    State(state): State<AppState>,
    caller: CallerToken,
    body: Option<Json<TokenBody>>,
) -> Result<ApiResponse<ClearResponse>, AppError> {
    let token = caller.or_body(body.and_then(|Json(b)| b.token));
    let user = state.identity_service.require(token.as_deref()).await?;

    let deleted = state.conversation_service.clear_history(user.id).await?;

    Ok(ApiResponse::success(ClearResponse { deleted }))
}
