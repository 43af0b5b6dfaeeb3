//! Application error type mapping to HTTP status codes and the error body.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use chatkeep_types::error::{AuthError, ConversationError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Identity and session errors.
    Auth(AuthError),
    /// Conversation store errors.
    Conversation(ConversationError),
    /// Malformed request input.
    Validation(String),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Auth(e)
    }
}

impl From<ConversationError> for AppError {
    fn from(e: ConversationError) -> Self {
        AppError::Conversation(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::Validation(e.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::Validation(e.body_text())
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Auth(AuthError::DuplicateUsername(_)) => {
                (StatusCode::CONFLICT, "DUPLICATE_USERNAME", self.message())
            }
            AppError::Auth(AuthError::InvalidCredentials) => {
                (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS", self.message())
            }
            AppError::Auth(AuthError::Unauthenticated) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", self.message())
            }
            AppError::Auth(AuthError::Validation(msg))
            | AppError::Conversation(ConversationError::Validation(msg))
            | AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Conversation(ConversationError::NotFoundOrForbidden) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", self.message())
            }
            AppError::Auth(AuthError::Storage(_))
            | AppError::Conversation(ConversationError::Storage(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                self.message(),
            ),
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Auth(e) => e.to_string(),
            AppError::Conversation(e) => e.to_string(),
            AppError::Validation(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if status.is_server_error() {
            tracing::error!(error = %self.message(), "request failed");
        }

        let body = json!({
            "status": "error",
            "code": code,
            "message": message,
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
