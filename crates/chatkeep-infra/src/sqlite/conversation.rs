//! SQLite conversation repository implementation.
//!
//! Messages live in a single JSON text column per conversation. Every query
//! is scoped by `user_id`, and saves go through one conditional upsert so a
//! concurrent first write from another user cannot take over an id.

use chatkeep_core::repository::conversation::{ConversationFilter, ConversationRepository};
use chatkeep_types::conversation::{Conversation, ConversationSummary, Message};
use chatkeep_types::error::RepositoryError;
use chatkeep_types::user::UserId;
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::Sqlite;
use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;

use super::pool::DatabasePool;
use super::{format_timestamp, parse_timestamp};

/// Owner scope plus optional filters. Each optional filter is bound twice:
/// once for the `IS NULL` guard and once for the comparison.
const FILTER_CLAUSE: &str = r#"user_id = ?
    AND (? IS NULL OR title LIKE ? ESCAPE '\')
    AND (? IS NULL OR updated_at >= ?)
    AND (? IS NULL OR updated_at <= ?)"#;

/// SQLite-backed implementation of `ConversationRepository`.
pub struct SqliteConversationRepository {
    pool: DatabasePool,
}

impl SqliteConversationRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

/// Internal row type for mapping SQLite rows to domain Conversation.
struct ConversationRow {
    id: String,
    user_id: i64,
    title: String,
    messages: String,
    updated_at: f64,
}

impl ConversationRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            title: row.try_get("title")?,
            messages: row.try_get("messages")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_conversation(self) -> Result<Conversation, RepositoryError> {
        let messages = decode_messages(&self.id, &self.messages);
        Ok(Conversation {
            id: self.id,
            user_id: UserId(self.user_id),
            title: self.title,
            messages,
            updated_at: parse_timestamp(self.updated_at)?,
        })
    }
}

/// Internal row type for the listing projection.
struct SummaryRow {
    id: String,
    title: String,
    updated_at: f64,
}

impl SummaryRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_summary(self) -> Result<ConversationSummary, RepositoryError> {
        Ok(ConversationSummary {
            id: self.id,
            title: self.title,
            updated_at: parse_timestamp(self.updated_at)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a stored message payload. A corrupt payload reads as no messages.
fn decode_messages(conversation_id: &str, payload: &str) -> Vec<Message> {
    match serde_json::from_str(payload) {
        Ok(messages) => messages,
        Err(e) => {
            tracing::warn!(
                conversation_id,
                error = %e,
                "malformed message payload, returning empty history"
            );
            Vec::new()
        }
    }
}

/// Turn a keyword into a LIKE pattern that matches it literally as a substring.
fn like_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for c in keyword.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Bind values for [`FILTER_CLAUSE`], in placeholder order.
struct FilterBinds {
    owner: i64,
    pattern: Option<String>,
    start: Option<f64>,
    end: Option<f64>,
}

impl FilterBinds {
    fn new(owner: UserId, filter: &ConversationFilter) -> Self {
        Self {
            owner: owner.0,
            pattern: filter.keyword.as_deref().map(like_pattern),
            start: filter.start_time.as_ref().map(format_timestamp),
            end: filter.end_time.as_ref().map(format_timestamp),
        }
    }

    fn apply<'q>(
        self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        query
            .bind(self.owner)
            .bind(self.pattern.clone())
            .bind(self.pattern)
            .bind(self.start)
            .bind(self.start)
            .bind(self.end)
            .bind(self.end)
    }
}

// ---------------------------------------------------------------------------
// ConversationRepository implementation
// ---------------------------------------------------------------------------

impl ConversationRepository for SqliteConversationRepository {
    async fn list(
        &self,
        owner: UserId,
        filter: &ConversationFilter,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<ConversationSummary>, RepositoryError> {
        let sql = format!(
            "SELECT id, title, updated_at FROM conversations WHERE {FILTER_CLAUSE} \
             ORDER BY updated_at DESC, rowid DESC LIMIT ? OFFSET ?"
        );

        let rows = FilterBinds::new(owner, filter)
            .apply(sqlx::query(&sql))
            .bind(i64::from(limit))
            .bind(i64::from(offset))
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut summaries = Vec::with_capacity(rows.len());
        for row in &rows {
            let summary_row =
                SummaryRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            summaries.push(summary_row.into_summary()?);
        }

        Ok(summaries)
    }

    async fn count(
        &self,
        owner: UserId,
        filter: &ConversationFilter,
    ) -> Result<u64, RepositoryError> {
        let sql = format!("SELECT COUNT(*) AS count FROM conversations WHERE {FILTER_CLAUSE}");

        let row = FilterBinds::new(owner, filter)
            .apply(sqlx::query(&sql))
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let count: i64 = row
            .try_get("count")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(count as u64)
    }

    async fn get(&self, id: &str, owner: UserId) -> Result<Option<Conversation>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM conversations WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(owner.0)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let conversation_row = ConversationRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(conversation_row.into_conversation()?))
            }
            None => Ok(None),
        }
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
        let payload =
            serde_json::to_string(messages).map_err(|e| RepositoryError::Query(e.to_string()))?;

        // The WHERE on the update arm makes a foreign-owned id a zero-row no-op.
        let result = sqlx::query(
            r#"INSERT INTO conversations (id, user_id, title, messages, updated_at)
               VALUES (?, ?, ?, ?, ?)
               ON CONFLICT(id) DO UPDATE SET
                   messages = excluded.messages,
                   title = CASE WHEN ? THEN excluded.title ELSE conversations.title END,
                   updated_at = excluded.updated_at
               WHERE conversations.user_id = excluded.user_id"#,
        )
        .bind(id)
        .bind(owner.0)
        .bind(title)
        .bind(&payload)
        .bind(format_timestamp(&updated_at))
        .bind(replace_title)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &str, owner: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM conversations WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(owner.0)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_for_owner(&self, owner: UserId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM conversations WHERE user_id = ?")
            .bind(owner.0)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
