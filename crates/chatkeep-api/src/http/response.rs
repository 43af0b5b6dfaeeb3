//! Success response shape.
//!
//! Every successful response is a flat JSON object tagged with
//! `"status": "success"`; the payload's fields sit alongside it:
//! ```json
//! { "status": "success", "token": "...", "username": "alice" }
//! ```

use axum::Json;
use axum::response::{IntoResponse, Response};
use chatkeep_types::conversation::{Conversation, ConversationSummary, Message};
use chatkeep_types::timestamp::to_epoch_seconds;
use serde::Serialize;

/// Success wrapper that flattens its payload next to `status`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    status: &'static str,
    #[serde(flatten)]
    body: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap a payload as a success response.
    pub fn success(body: T) -> Self {
        Self {
            status: "success",
            body,
        }
    }
}

impl ApiResponse<Empty> {
    /// A success response with no payload.
    pub fn ok() -> Self {
        Self::success(Empty {})
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// No payload beyond the status.
#[derive(Debug, Serialize)]
pub struct Empty {}

/// Listing row with `updated_at` as epoch seconds.
#[derive(Debug, Serialize)]
pub struct SummaryView {
    pub id: String,
    pub title: String,
    pub updated_at: f64,
}

impl From<ConversationSummary> for SummaryView {
    fn from(s: ConversationSummary) -> Self {
        Self {
            updated_at: to_epoch_seconds(&s.updated_at),
            id: s.id,
            title: s.title,
        }
    }
}

/// Full conversation with `updated_at` as epoch seconds.
#[derive(Debug, Serialize)]
pub struct ConversationView {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub updated_at: f64,
}

impl From<Conversation> for ConversationView {
    fn from(c: Conversation) -> Self {
        Self {
            updated_at: to_epoch_seconds(&c.updated_at),
            id: c.id,
            title: c.title,
            messages: c.messages,
        }
    }
}
