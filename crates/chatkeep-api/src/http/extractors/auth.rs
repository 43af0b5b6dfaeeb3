//! Session token extractor.
//!
//! A caller's token may arrive in any of:
//! - `Authorization: Bearer <token>` header
//! - `?token=<token>` query parameter
//! - a `token` field in the JSON body (merged by the handler via
//!   [`CallerToken::or_body`])
//!
//! Extraction never fails on absence; handlers decide whether a token is
//! required by calling `IdentityService::require`.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::Deserialize;

use chatkeep_types::error::AuthError;

use crate::http::error::AppError;

/// The session token presented with a request, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerToken(pub Option<String>);

impl CallerToken {
    /// Fall back to a token carried in the request body.
    pub fn or_body(self, body_token: Option<String>) -> Option<String> {
        self.0.or(body_token)
    }

    /// Borrow the token as `&str`.
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

#[derive(Debug, Deserialize)]
struct TokenParam {
    token: Option<String>,
}

impl<S: Send + Sync> FromRequestParts<S> for CallerToken {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(auth) = parts.headers.get("authorization") {
            let auth_str = auth
                .to_str()
                .map_err(|_| AppError::Auth(AuthError::Unauthenticated))?;
            // An empty bearer value counts as no header.
            let bearer = auth_str
                .strip_prefix("Bearer ")
                .map(str::trim)
                .filter(|token| !token.is_empty());
            if let Some(token) = bearer {
                return Ok(CallerToken(Some(token.to_string())));
            }
        }

        let from_query = Query::<TokenParam>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(param)| param.token);

        Ok(CallerToken(from_query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> CallerToken {
        let (mut parts, _) = request.into_parts();
        CallerToken::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_bearer_header() {
        let request = Request::builder()
            .uri("/conversations")
            .header("authorization", "Bearer abc123")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await, CallerToken(Some("abc123".into())));
    }

    #[tokio::test]
    async fn test_query_parameter() {
        let request = Request::builder()
            .uri("/conversations?limit=5&token=xyz")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await, CallerToken(Some("xyz".into())));
    }

    #[tokio::test]
    async fn test_header_wins_over_query() {
        let request = Request::builder()
            .uri("/conversations?token=query")
            .header("authorization", "Bearer header")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await, CallerToken(Some("header".into())));
    }

    #[tokio::test]
    async fn test_absent_token_then_body_fallback() {
        let request = Request::builder().uri("/logout").body(()).unwrap();
        let caller = extract(request).await;
        assert_eq!(caller, CallerToken(None));
        assert_eq!(caller.or_body(Some("body".into())), Some("body".into()));
    }

    #[tokio::test]
    async fn test_empty_bearer_falls_back_to_query() {
        let request = Request::builder()
            .uri("/conversations?token=xyz")
            .header("authorization", "Bearer ")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await, CallerToken(Some("xyz".into())));
    }

    #[tokio::test]
    async fn test_empty_bearer_falls_back_to_body() {
        let request = Request::builder()
            .uri("/conversations/clear")
            .header("authorization", "Bearer   ")
            .body(())
            .unwrap();
        let caller = extract(request).await;
        assert_eq!(caller, CallerToken(None));
        assert_eq!(caller.or_body(Some("body".into())), Some("body".into()));
    }
}
