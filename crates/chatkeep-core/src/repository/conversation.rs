//! Conversation repository trait definition.

use chatkeep_types::conversation::{Conversation, ConversationSummary, Message};
use chatkeep_types::error::RepositoryError;
use chatkeep_types::user::UserId;
use chrono::{DateTime, Utc};

/// Filter criteria for listing and counting an owner's conversations.
///
/// All fields are optional and combine with AND.
#[derive(Debug, Clone, Default)]
pub struct ConversationFilter {
    /// Case-insensitive substring of the title.
    pub keyword: Option<String>,
    /// Inclusive lower bound on `updated_at`.
    pub start_time: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `updated_at`.
    pub end_time: Option<DateTime<Utc>>,
}

/// Repository trait for conversation persistence.
///
/// Every read and mutation is scoped by owner. A conversation owned by
/// someone else must look exactly like a missing one.
pub trait ConversationRepository: Send + Sync {
    /// List matching conversations, most recently updated first.
    fn list(
        &self,
        owner: UserId,
        filter: &ConversationFilter,
        limit: u32,
        offset: u32,
    ) -> impl std::future::Future<Output = Result<Vec<ConversationSummary>, RepositoryError>> + Send;

    /// Count matching conversations (same filter as `list`, no pagination).
    fn count(
        &self,
        owner: UserId,
        filter: &ConversationFilter,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Fetch a conversation by id if `owner` owns it.
    fn get(
        &self,
        id: &str,
        owner: UserId,
    ) -> impl std::future::Future<Output = Result<Option<Conversation>, RepositoryError>> + Send;

    /// Create or overwrite a conversation in one atomic step.
    ///
    /// - New id: inserted under `owner` with `title` (the caller resolves defaults).
    /// - Existing id, same owner: messages replaced, `updated_at` refreshed,
    ///   title replaced only when `replace_title` is true.
    /// - Existing id, other owner: nothing changes and `Ok(false)` is returned.
    fn upsert(
        &self,
        id: &str,
        owner: UserId,
        messages: &[Message],
        title: &str,
        replace_title: bool,
        updated_at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Delete a conversation if `owner` owns it. Returns whether a row was removed.
    fn delete(
        &self,
        id: &str,
        owner: UserId,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Delete every conversation owned by `owner`. Returns the count removed.
    fn delete_all_for_owner(
        &self,
        owner: UserId,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
