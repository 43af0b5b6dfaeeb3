//! Session repository trait definition.

use chatkeep_types::error::RepositoryError;
use chatkeep_types::session::AuthSession;
use chatkeep_types::user::AuthenticatedUser;
use chrono::{DateTime, Utc};

/// Repository trait for login session persistence.
pub trait SessionRepository: Send + Sync {
    /// Delete every session of `session.user_id`, then insert `session`.
    ///
    /// Both steps must commit together so a user never ends up with zero or
    /// two live sessions after a login.
    fn replace_for_user(
        &self,
        session: &AuthSession,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Resolve a token to its owning user if the session expires strictly
    /// after `now`. Unknown and expired tokens both yield `None`.
    fn find_active(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<Option<AuthenticatedUser>, RepositoryError>> + Send;

    /// Delete the session with this token. Deleting a missing token is not an error.
    fn delete(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete sessions whose expiry is at or before `now`. Returns the count removed.
    fn purge_expired(
        &self,
        now: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
