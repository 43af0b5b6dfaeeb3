use thiserror::Error;

/// Errors from registration, login, and token resolution.
///
/// `InvalidCredentials` deliberately covers both unknown usernames and wrong
/// passwords; `Unauthenticated` covers missing, unknown, and expired tokens.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("username '{0}' already exists")]
    DuplicateUsername(String),

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("authentication required")]
    Unauthenticated,

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors from conversation operations.
///
/// Absent ids and ids owned by someone else both surface as
/// `NotFoundOrForbidden` so callers cannot probe for existence.
#[derive(Debug, Error)]
pub enum ConversationError {
    #[error("conversation not found")]
    NotFoundOrForbidden,

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors from repository operations (used by trait definitions in chatkeep-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("query error: {0}")]
    Query(String),

    #[error("conflict: {0}")]
    Conflict(String),
}

impl From<RepositoryError> for ConversationError {
    fn from(e: RepositoryError) -> Self {
        ConversationError::Storage(e.to_string())
    }
}
