//! Conversation store service.
//!
//! Owner-scoped create/update/list/fetch/delete over a
//! `ConversationRepository`, plus the send-message flow that appends to an
//! existing conversation before saving it back wholesale.

use chatkeep_types::conversation::{
    AppendOutcome, Conversation, ConversationPage, DEFAULT_TITLE, Message,
};
use chatkeep_types::error::ConversationError;
use chatkeep_types::user::UserId;
use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::repository::conversation::{ConversationFilter, ConversationRepository};
use crate::service::title::derive_title;

/// Default page size for listings.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Default upper bound on a requested page size.
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 100;

/// Listing parameters as received from a caller.
#[derive(Debug, Clone, Default)]
pub struct ConversationQuery {
    pub limit: Option<u32>,
    pub offset: u32,
    pub keyword: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl ConversationQuery {
    fn filter(&self) -> ConversationFilter {
        ConversationFilter {
            keyword: self
                .keyword
                .as_deref()
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string),
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }
}

/// Orchestrates owner-scoped conversation persistence.
pub struct ConversationService<C: ConversationRepository> {
    repo: C,
    default_page_size: u32,
    max_page_size: u32,
}

impl<C: ConversationRepository> ConversationService<C> {
    /// Create a new conversation service with default paging limits.
    pub fn new(repo: C) -> Self {
        Self {
            repo,
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }

    /// Override the default and maximum page sizes.
    pub fn with_page_limits(mut self, default_page_size: u32, max_page_size: u32) -> Self {
        self.max_page_size = max_page_size.max(1);
        self.default_page_size = default_page_size.clamp(1, self.max_page_size);
        self
    }

    /// List one page of the owner's conversations with the total match count.
    ///
    /// Runs the list and count queries with the same filter. No matches is
    /// an empty page, not an error.
    pub async fn list_conversations(
        &self,
        owner: UserId,
        query: &ConversationQuery,
    ) -> Result<ConversationPage, ConversationError> {
        let filter = query.filter();
        let limit = query
            .limit
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size);

        let items = self.repo.list(owner, &filter, limit, query.offset).await?;
        let total = self.repo.count(owner, &filter).await?;

        debug!(owner = %owner, returned = items.len(), total, "listed conversations");
        Ok(ConversationPage {
            items,
            total,
            limit,
            offset: query.offset,
        })
    }

    /// Fetch a conversation the owner can see.
    pub async fn get_conversation(
        &self,
        id: &str,
        owner: UserId,
    ) -> Result<Option<Conversation>, ConversationError> {
        Ok(self.repo.get(id, owner).await?)
    }

    /// Create or overwrite a conversation.
    ///
    /// The message sequence replaces the stored one wholesale. An empty
    /// `title` counts as absent: existing titles are kept, new conversations
    /// get [`DEFAULT_TITLE`]. Saving over another user's conversation is
    /// rejected with `NotFoundOrForbidden` and changes nothing.
    #[tracing::instrument(name = "save_conversation", skip(self, messages, title), fields(messages = messages.len()))]
    pub async fn save_conversation(
        &self,
        id: &str,
        owner: UserId,
        messages: &[Message],
        title: Option<&str>,
    ) -> Result<(), ConversationError> {
        if id.is_empty() {
            return Err(ConversationError::Validation(
                "conversation id cannot be empty".to_string(),
            ));
        }

        let supplied = title.filter(|t| !t.is_empty());
        let accepted = self
            .repo
            .upsert(
                id,
                owner,
                messages,
                supplied.unwrap_or(DEFAULT_TITLE),
                supplied.is_some(),
                Utc::now(),
            )
            .await?;

        if !accepted {
            info!("save rejected: conversation owned by another user");
            return Err(ConversationError::NotFoundOrForbidden);
        }
        Ok(())
    }

    /// Append a message to a conversation, creating it if needed.
    ///
    /// A missing or empty id starts a new conversation under a fresh id.
    /// The title is derived from `message` only when the conversation is
    /// created; later appends keep the existing title.
    pub async fn append_message(
        &self,
        owner: UserId,
        conversation_id: Option<&str>,
        message: Message,
    ) -> Result<AppendOutcome, ConversationError> {
        let id = match conversation_id.filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => Uuid::now_v7().to_string(),
        };

        let (mut messages, created) = match self.repo.get(&id, owner).await? {
            Some(existing) => (existing.messages, false),
            None => (Vec::new(), true),
        };

        let title = created.then(|| derive_title(&message.content));
        messages.push(message);

        self.save_conversation(&id, owner, &messages, title.as_deref())
            .await?;

        Ok(AppendOutcome {
            conversation_id: id,
            created,
        })
    }

    /// Delete a conversation the owner can see. Missing ids are a no-op.
    pub async fn delete_conversation(
        &self,
        id: &str,
        owner: UserId,
    ) -> Result<(), ConversationError> {
        let removed = self.repo.delete(id, owner).await?;
        debug!(owner = %owner, removed, "delete conversation");
        Ok(())
    }

    /// Delete all of the owner's conversations. Returns the count removed.
    pub async fn clear_history(&self, owner: UserId) -> Result<u64, ConversationError> {
        let removed = self.repo.delete_all_for_owner(owner).await?;
        info!(owner = %owner, removed, "history cleared");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatkeep_types::conversation::ConversationSummary;
    use chatkeep_types::error::RepositoryError;
    use chrono::Duration;
    use std::sync::Mutex;

    /// In-memory repository mirroring the SQLite semantics.
    #[derive(Default)]
    struct MemoryConversations {
        rows: Mutex<Vec<Conversation>>,
    }

    impl MemoryConversations {
        fn matching(&self, owner: UserId, filter: &ConversationFilter) -> Vec<ConversationSummary> {
            let rows = self.rows.lock().unwrap();
            let mut hits: Vec<&Conversation> = rows
                .iter()
                .filter(|c| c.user_id == owner)
                .filter(|c| match &filter.keyword {
                    Some(k) => c.title.to_lowercase().contains(&k.to_lowercase()),
                    None => true,
                })
                .filter(|c| filter.start_time.is_none_or(|t| c.updated_at >= t))
                .filter(|c| filter.end_time.is_none_or(|t| c.updated_at <= t))
                .collect();
            hits.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
            hits.into_iter()
                .map(|c| ConversationSummary {
                    id: c.id.clone(),
                    title: c.title.clone(),
                    updated_at: c.updated_at,
                })
                .collect()
        }
    }

    impl ConversationRepository for MemoryConversations {
        async fn list(
            &self,
            owner: UserId,
            filter: &ConversationFilter,
            limit: u32,
            offset: u32,
        ) -> Result<Vec<ConversationSummary>, RepositoryError> {
            Ok(self
                .matching(owner, filter)
                .into_iter()
                .skip(offset as usize)
                .take(limit as usize)
                .collect())
        }

        async fn count(
            &self,
            owner: UserId,
            filter: &ConversationFilter,
        ) -> Result<u64, RepositoryError> {
            Ok(self.matching(owner, filter).len() as u64)
        }

        async fn get(&self, id: &str, owner: UserId) -> Result<Option<Conversation>, RepositoryError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows
                .iter()
                .find(|c| c.id == id && c.user_id == owner)
                .cloned())
        }

        async fn upsert(
            &self,
            id: &str,
            owner: UserId,
            messages: &[Message],
            title: &str,
            replace_title: bool,
            updated_at: DateTime<Utc>,
        ) -> Result<bool, RepositoryError> {
            let mut rows = self.rows.lock().unwrap();
            match rows.iter_mut().find(|c| c.id == id) {
                Some(existing) if existing.user_id != owner => Ok(false),
                Some(existing) => {
                    existing.messages = messages.to_vec();
                    existing.updated_at = updated_at;
                    if replace_title {
                        existing.title = title.to_string();
                    }
                    Ok(true)
                }
                None => {
                    rows.push(Conversation {
                        id: id.to_string(),
                        user_id: owner,
                        title: title.to_string(),
                        messages: messages.to_vec(),
                        updated_at,
                    });
                    Ok(true)
                }
            }
        }

        async fn delete(&self, id: &str, owner: UserId) -> Result<bool, RepositoryError> {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|c| !(c.id == id && c.user_id == owner));
            Ok(rows.len() < before)
        }

        async fn delete_all_for_owner(&self, owner: UserId) -> Result<u64, RepositoryError> {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|c| c.user_id != owner);
            Ok((before - rows.len()) as u64)
        }
    }

    const ALICE: UserId = UserId(1);
    const BOB: UserId = UserId(2);

    fn service() -> ConversationService<MemoryConversations> {
        ConversationService::new(MemoryConversations::default())
    }

    /// Insert a conversation with an explicit timestamp.
    fn seed(service: &ConversationService<MemoryConversations>, id: &str, title: &str, age_secs: i64) {
        service.repo.rows.lock().unwrap().push(Conversation {
            id: id.to_string(),
            user_id: ALICE,
            title: title.to_string(),
            messages: vec![Message::user(title)],
            updated_at: Utc::now() - Duration::seconds(age_secs),
        });
    }

    #[tokio::test]
    async fn test_save_new_without_title_uses_placeholder() {
        let service = service();
        service
            .save_conversation("c1", ALICE, &[Message::user("hello")], None)
            .await
            .unwrap();
        let conv = service.get_conversation("c1", ALICE).await.unwrap().unwrap();
        assert_eq!(conv.title, DEFAULT_TITLE);

        service
            .save_conversation("c2", ALICE, &[], Some(""))
            .await
            .unwrap();
        let conv = service.get_conversation("c2", ALICE).await.unwrap().unwrap();
        assert_eq!(conv.title, DEFAULT_TITLE);
    }

    #[tokio::test]
    async fn test_save_existing_replaces_messages_and_keeps_title() {
        let service = service();
        service
            .save_conversation("c1", ALICE, &[Message::user("one")], Some("First"))
            .await
            .unwrap();
        service
            .save_conversation("c1", ALICE, &[Message::user("two")], None)
            .await
            .unwrap();

        let conv = service.get_conversation("c1", ALICE).await.unwrap().unwrap();
        assert_eq!(conv.title, "First");
        assert_eq!(conv.messages, vec![Message::user("two")]);

        service
            .save_conversation("c1", ALICE, &[], Some("Renamed"))
            .await
            .unwrap();
        let conv = service.get_conversation("c1", ALICE).await.unwrap().unwrap();
        assert_eq!(conv.title, "Renamed");
        assert!(conv.messages.is_empty());
    }

    #[tokio::test]
    async fn test_save_over_foreign_conversation_is_rejected() {
        let service = service();
        service
            .save_conversation("c1", ALICE, &[Message::user("mine")], Some("Mine"))
            .await
            .unwrap();

        let err = service
            .save_conversation("c1", BOB, &[Message::user("theirs")], Some("Theirs"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConversationError::NotFoundOrForbidden));

        let conv = service.get_conversation("c1", ALICE).await.unwrap().unwrap();
        assert_eq!(conv.title, "Mine");
        assert_eq!(conv.messages, vec![Message::user("mine")]);
    }

    #[tokio::test]
    async fn test_save_rejects_empty_id() {
        let service = service();
        let err = service
            .save_conversation("", ALICE, &[], None)
            .await
            .unwrap_err();
        assert!(matches!(err, ConversationError::Validation(_)));
    }

    #[tokio::test]
    async fn test_foreign_fetch_and_delete_look_like_missing() {
        let service = service();
        service
            .save_conversation("c1", ALICE, &[Message::user("hi")], None)
            .await
            .unwrap();

        assert!(service.get_conversation("c1", BOB).await.unwrap().is_none());
        assert!(service.get_conversation("nope", BOB).await.unwrap().is_none());

        service.delete_conversation("c1", BOB).await.unwrap();
        service.delete_conversation("nope", BOB).await.unwrap();
        assert!(service.get_conversation("c1", ALICE).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_append_creates_distinct_conversations() {
        let service = service();
        let first = service
            .append_message(ALICE, None, Message::user("First conversation message"))
            .await
            .unwrap();
        let second = service
            .append_message(ALICE, None, Message::user("Second conversation message"))
            .await
            .unwrap();

        assert!(first.created && second.created);
        assert_ne!(first.conversation_id, second.conversation_id);

        let c1 = service
            .get_conversation(&first.conversation_id, ALICE)
            .await
            .unwrap()
            .unwrap();
        let c2 = service
            .get_conversation(&second.conversation_id, ALICE)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(c1.messages[0].content, "First conversation message");
        assert_eq!(c2.messages[0].content, "Second conversation message");
    }

    #[tokio::test]
    async fn test_append_derives_title_and_keeps_full_content() {
        let service = service();
        let prompt: String = "abcdefghij".repeat(10);
        let outcome = service
            .append_message(ALICE, None, Message::user(prompt.clone()))
            .await
            .unwrap();

        let conv = service
            .get_conversation(&outcome.conversation_id, ALICE)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(conv.title, &prompt[..20]);
        assert_eq!(conv.messages[0].content.chars().count(), 100);
    }

    #[tokio::test]
    async fn test_append_to_existing_keeps_title_and_order() {
        let service = service();
        let first = service
            .append_message(ALICE, None, Message::user("Hi"))
            .await
            .unwrap();
        let second = service
            .append_message(
                ALICE,
                Some(&first.conversation_id),
                Message::user("Second message in same conversation"),
            )
            .await
            .unwrap();

        assert_eq!(second.conversation_id, first.conversation_id);
        assert!(!second.created);

        let conv = service
            .get_conversation(&first.conversation_id, ALICE)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(conv.title, "Hi");
        let contents: Vec<&str> = conv.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["Hi", "Second message in same conversation"]);
    }

    #[tokio::test]
    async fn test_append_to_foreign_conversation_is_rejected() {
        let service = service();
        let outcome = service
            .append_message(ALICE, None, Message::user("private"))
            .await
            .unwrap();

        let err = service
            .append_message(BOB, Some(&outcome.conversation_id), Message::user("intrusion"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConversationError::NotFoundOrForbidden));

        let conv = service
            .get_conversation(&outcome.conversation_id, ALICE)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(conv.messages.len(), 1);
    }

    #[tokio::test]
    async fn test_list_keyword_filter() {
        let service = service();
        seed(&service, "p", "Python Help", 30);
        seed(&service, "j", "Java Help", 20);
        seed(&service, "r", "Rust Help", 10);

        let page = service
            .list_conversations(
                ALICE,
                &ConversationQuery {
                    keyword: Some("python".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].title, "Python Help");
    }

    #[tokio::test]
    async fn test_list_blank_keyword_is_ignored() {
        let service = service();
        seed(&service, "p", "Python Help", 30);
        seed(&service, "j", "Java Help", 20);

        let page = service
            .list_conversations(
                ALICE,
                &ConversationQuery {
                    keyword: Some("   ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(page.total, 2);
    }

    #[tokio::test]
    async fn test_list_date_range() {
        let service = service();
        seed(&service, "old", "Old", 600);
        seed(&service, "mid", "Mid", 300);
        seed(&service, "new", "New", 10);

        let page = service
            .list_conversations(
                ALICE,
                &ConversationQuery {
                    start_time: Some(Utc::now() - Duration::seconds(400)),
                    end_time: Some(Utc::now() - Duration::seconds(100)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let ids: Vec<&str> = page.items.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["mid"]);
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn test_list_pages_partition_full_order() {
        let service = service();
        seed(&service, "a", "A", 30);
        seed(&service, "b", "B", 20);
        seed(&service, "c", "C", 10);

        let all = service
            .list_conversations(ALICE, &ConversationQuery::default())
            .await
            .unwrap();
        let ids: Vec<&str> = all.items.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);

        let mut paged = Vec::new();
        for offset in 0..3 {
            let page = service
                .list_conversations(
                    ALICE,
                    &ConversationQuery {
                        limit: Some(1),
                        offset,
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
            assert_eq!(page.items.len(), 1);
            assert_eq!(page.total, 3);
            paged.push(page.items[0].id.clone());
        }
        assert_eq!(paged, vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn test_list_clamps_limit() {
        let service = service().with_page_limits(2, 5);
        for i in 0..7 {
            seed(&service, &format!("c{i}"), "T", i);
        }

        let default_page = service
            .list_conversations(ALICE, &ConversationQuery::default())
            .await
            .unwrap();
        assert_eq!(default_page.items.len(), 2);
        assert_eq!(default_page.limit, 2);

        let big = service
            .list_conversations(
                ALICE,
                &ConversationQuery {
                    limit: Some(1000),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(big.items.len(), 5);
        assert_eq!(big.total, 7);
    }

    #[tokio::test]
    async fn test_list_empty_is_not_an_error() {
        let service = service();
        let page = service
            .list_conversations(BOB, &ConversationQuery::default())
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_delete_and_clear_history() {
        let service = service();
        service
            .save_conversation("c1", ALICE, &[Message::user("a")], None)
            .await
            .unwrap();
        service
            .save_conversation("c2", ALICE, &[Message::user("b")], None)
            .await
            .unwrap();
        service
            .save_conversation("c3", BOB, &[Message::user("c")], None)
            .await
            .unwrap();

        service.delete_conversation("c1", ALICE).await.unwrap();
        assert!(service.get_conversation("c1", ALICE).await.unwrap().is_none());
        let page = service
            .list_conversations(ALICE, &ConversationQuery::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);

        assert_eq!(service.clear_history(ALICE).await.unwrap(), 1);
        assert_eq!(service.clear_history(ALICE).await.unwrap(), 0);
        assert!(service.get_conversation("c3", BOB).await.unwrap().is_some());
    }
}
