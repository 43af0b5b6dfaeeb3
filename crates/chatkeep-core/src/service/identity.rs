//! Identity and session management service.
//!
//! Registers users, verifies credentials, and issues, resolves, and revokes
//! session tokens. One live session per user: every login revokes the
//! user's earlier sessions.

use chatkeep_types::error::{AuthError, RepositoryError};
use chatkeep_types::session::{AuthSession, LoginGrant};
use chatkeep_types::user::{AuthenticatedUser, NewUser, User};
use chrono::{Duration, Utc};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::repository::session::SessionRepository;
use crate::repository::user::UserRepository;
use crate::service::hash::PasswordHasher;

/// Default session lifetime.
pub const DEFAULT_SESSION_TTL_DAYS: i64 = 7;

/// Service orchestrating user registration and the session-token lifecycle.
///
/// Generic over repository and hasher traits to maintain clean
/// architecture -- chatkeep-core never depends on chatkeep-infra.
pub struct IdentityService<U: UserRepository, S: SessionRepository, H: PasswordHasher> {
    user_repo: U,
    session_repo: S,
    hasher: H,
    session_ttl: Duration,
}

impl<U: UserRepository, S: SessionRepository, H: PasswordHasher> IdentityService<U, S, H> {
    /// Create a new IdentityService with the default 7-day session lifetime.
    pub fn new(user_repo: U, session_repo: S, hasher: H) -> Self {
        Self {
            user_repo,
            session_repo,
            hasher,
            session_ttl: Duration::days(DEFAULT_SESSION_TTL_DAYS),
        }
    }

    /// Override the session lifetime.
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Register a new user with a freshly salted password hash.
    #[tracing::instrument(name = "register", skip(self, password))]
    pub async fn register(&self, username: &str, password: &str) -> Result<User, AuthError> {
        if username.is_empty() {
            return Err(AuthError::Validation("username cannot be empty".to_string()));
        }
        if password.is_empty() {
            return Err(AuthError::Validation("password cannot be empty".to_string()));
        }

        let salt = self.hasher.generate_salt();
        let new_user = NewUser {
            username: username.to_string(),
            password_hash: self.hasher.hash(password, &salt),
            salt,
            created_at: Utc::now(),
        };

        let user = self.user_repo.create(&new_user).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::DuplicateUsername(username.to_string()),
            other => {
                error!(error = %other, "user registration failed");
                AuthError::Storage(other.to_string())
            }
        })?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Verify credentials and open a new session, revoking all earlier ones.
    ///
    /// Unknown usernames and wrong passwords are indistinguishable.
    #[tracing::instrument(name = "login", skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginGrant, AuthError> {
        let user = self
            .user_repo
            .get_by_username(username)
            .await
            .map_err(storage_error)?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.hasher.verify(password, &user.salt, &user.password_hash) {
            debug!("password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let session = AuthSession {
            token: Uuid::new_v4().to_string(),
            user_id: user.id,
            expires_at: Utc::now() + self.session_ttl,
        };

        self.session_repo
            .replace_for_user(&session)
            .await
            .map_err(storage_error)?;

        info!(user_id = %user.id, "session opened");
        Ok(LoginGrant {
            token: session.token,
            username: user.username,
            expires_at: session.expires_at,
        })
    }

    /// Resolve a token to the identity it grants, if it is still valid.
    ///
    /// An empty token returns `None` without touching the store. Expiry is
    /// never extended by a lookup.
    pub async fn resolve(&self, token: &str) -> Result<Option<AuthenticatedUser>, AuthError> {
        if token.is_empty() {
            return Ok(None);
        }
        self.session_repo
            .find_active(token, Utc::now())
            .await
            .map_err(storage_error)
    }

    /// Like [`resolve`](Self::resolve), but a missing identity is an error.
    pub async fn require(&self, token: Option<&str>) -> Result<AuthenticatedUser, AuthError> {
        self.resolve(token.unwrap_or_default())
            .await?
            .ok_or(AuthError::Unauthenticated)
    }

    /// Revoke a session. Unknown tokens are ignored.
    #[tracing::instrument(name = "logout", skip_all)]
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        if token.is_empty() {
            return Ok(());
        }
        self.session_repo.delete(token).await.map_err(storage_error)?;
        info!("session closed");
        Ok(())
    }

    /// Remove sessions that have already expired. Returns the count removed.
    pub async fn purge_expired_sessions(&self) -> Result<u64, AuthError> {
        let removed = self
            .session_repo
            .purge_expired(Utc::now())
            .await
            .map_err(storage_error)?;
        info!(removed, "expired sessions purged");
        Ok(removed)
    }
}

fn storage_error(e: RepositoryError) -> AuthError {
    error!(error = %e, "identity store failure");
    AuthError::Storage(e.to_string())
}
