//! Registration and session HTTP handlers.
//!
//! Endpoints:
//! - POST /register - Create an account
//! - POST /login    - Exchange credentials for a session token
//! - POST /logout   - Revoke the caller's session token

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};

use chatkeep_types::timestamp::to_epoch_seconds;

use crate::http::error::AppError;
use crate::http::extractors::auth::CallerToken;
use crate::http::response::{ApiResponse, Empty};
use crate::state::AppState;

/// Username and password as submitted by a client.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Body for endpoints that only need a token.
#[derive(Debug, Default, Deserialize)]
pub struct TokenBody {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub expires_at: f64,
}

/// POST /register - Create an account.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<ApiResponse<RegisterResponse>, AppError> {
    let Json(body) = payload?;
    let user = state
        .identity_service
        .register(&body.username, &body.password)
        .await?;

    Ok(ApiResponse::success(RegisterResponse {
        message: "User registered successfully",
        username: user.username,
    }))
}

/// POST /login - Exchange credentials for a session token.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<ApiResponse<LoginResponse>, AppError> {
    let Json(body) = payload?;
    let grant = state
        .identity_service
        .login(&body.username, &body.password)
        .await?;

    Ok(ApiResponse::success(LoginResponse {
        expires_at: to_epoch_seconds(&grant.expires_at),
        token: grant.token,
        username: grant.username,
    }))
}

/// POST /logout - Revoke the caller's session token.
///
/// Succeeds for unknown or missing tokens.
pub async fn logout(
    State(state): State<AppState>,
    caller: CallerToken,
    body: Option<Json<TokenBody>>,
) -> Result<ApiResponse<Empty>, AppError> {
    let token = caller.or_body(body.and_then(|Json(b)| b.token));
    state
        .identity_service
        .logout(token.as_deref().unwrap_or_default())
        .await?;

    Ok(ApiResponse::ok())
}
