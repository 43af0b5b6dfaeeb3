//! SQLite session repository implementation.

use chatkeep_core::repository::session::SessionRepository;
use chatkeep_types::error::RepositoryError;
use chatkeep_types::session::AuthSession;
use chatkeep_types::user::{AuthenticatedUser, UserId};
use chrono::{DateTime, Utc};
use sqlx::Row;

use super::format_timestamp;
use super::pool::DatabasePool;

/// SQLite-backed implementation of `SessionRepository`.
pub struct SqliteSessionRepository {
    pool: DatabasePool,
}

impl SqliteSessionRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl SessionRepository for SqliteSessionRepository {
    async fn replace_for_user(&self, session: &AuthSession) -> Result<(), RepositoryError> {
        // Revoke-then-issue must land together: single-session-per-user.
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        sqlx::query("DELETE FROM sessions WHERE user_id = ?")
            .bind(session.user_id.0)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        sqlx::query("INSERT INTO sessions (token, user_id, expires_at) VALUES (?, ?, ?)")
            .bind(&session.token)
            .bind(session.user_id.0)
            .bind(format_timestamp(&session.expires_at))
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e {
                    if db_err.message().contains("UNIQUE") {
                        return RepositoryError::Conflict("session token already issued".to_string());
                    }
                }
                RepositoryError::Query(e.to_string())
            })?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn find_active(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<AuthenticatedUser>, RepositoryError> {
        let row = sqlx::query(
            r#"SELECT u.id, u.username
               FROM users u JOIN sessions s ON u.id = s.user_id
               WHERE s.token = ? AND s.expires_at > ?"#,
        )
        .bind(token)
        .bind(format_timestamp(&now))
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let id: i64 = row
                    .try_get("id")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                let username: String = row
                    .try_get("username")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(AuthenticatedUser {
                    id: UserId(id),
                    username,
                }))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, token: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(format_timestamp(&now))
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
