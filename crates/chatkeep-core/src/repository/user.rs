//! User repository trait definition.

use chatkeep_types::error::RepositoryError;
use chatkeep_types::user::{NewUser, User};

/// Repository trait for user persistence.
///
/// Implementations live in chatkeep-infra (e.g., `SqliteUserRepository`).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait UserRepository: Send + Sync {
    /// Insert a new user and return it with its store-assigned id.
    ///
    /// Must return `RepositoryError::Conflict` when the username is taken.
    fn create(
        &self,
        user: &NewUser,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    /// Look up a user by exact (case-sensitive) username.
    fn get_by_username(
        &self,
        username: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;
}
