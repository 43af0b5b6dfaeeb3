//! SQLite user repository implementation.

use chatkeep_core::repository::user::UserRepository;
use chatkeep_types::error::RepositoryError;
use chatkeep_types::user::{NewUser, User, UserId};
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_timestamp, parse_timestamp};

/// SQLite-backed implementation of `UserRepository`.
pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain User.
struct UserRow {
    id: i64,
    username: String,
    password_hash: String,
    salt: String,
    created_at: f64,
}

impl UserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            password_hash: row.try_get("password_hash")?,
            salt: row.try_get("salt")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_user(self) -> Result<User, RepositoryError> {
        Ok(User {
            id: UserId(self.id),
            username: self.username,
            password_hash: self.password_hash,
            salt: self.salt,
            created_at: parse_timestamp(self.created_at)?,
        })
    }
}

fn map_user(row: Option<sqlx::sqlite::SqliteRow>) -> Result<Option<User>, RepositoryError> {
    match row {
        Some(row) => {
            let user_row =
                UserRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            Ok(Some(user_row.into_user()?))
        }
        None => Ok(None),
    }
}

impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO users (username, password_hash, salt, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.salt)
        .bind(format_timestamp(&user.created_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(done) => Ok(User {
                id: UserId(done.last_insert_rowid()),
                username: user.username.clone(),
                password_hash: user.password_hash.clone(),
                salt: user.salt.clone(),
                created_at: user.created_at,
            }),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => Err(
                RepositoryError::Conflict(format!("username '{}' already exists", user.username)),
            ),
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        map_user(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::test_support::test_pool;
    use chrono::Utc;

    fn make_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password_hash: "hash".to_string(),
            salt: "salt".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let repo = SqliteUserRepository::new(test_pool().await);

        let created = repo.create(&make_user("alice")).await.unwrap();
        assert!(created.id.0 > 0);

        let by_name = repo.get_by_username("alice").await.unwrap().unwrap();
        assert_eq!(by_name.id, created.id);
        assert_eq!(by_name.salt, "salt");
        assert_eq!(
            by_name.created_at.timestamp_micros(),
            created.created_at.timestamp_micros()
        );
    }

    #[tokio::test]
    async fn test_ids_are_distinct() {
        let repo = SqliteUserRepository::new(test_pool().await);
        let a = repo.create(&make_user("a")).await.unwrap();
        let b = repo.create(&make_user("b")).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_duplicate_username_conflict() {
        let repo = SqliteUserRepository::new(test_pool().await);
        repo.create(&make_user("alice")).await.unwrap();

        let err = repo.create(&make_user("alice")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_username_lookup_is_case_sensitive() {
        let repo = SqliteUserRepository::new(test_pool().await);
        repo.create(&make_user("alice")).await.unwrap();

        assert!(repo.get_by_username("Alice").await.unwrap().is_none());
        assert!(repo.create(&make_user("Alice")).await.is_ok());
    }

    #[tokio::test]
    async fn test_get_missing_user() {
        let repo = SqliteUserRepository::new(test_pool().await);
        assert!(repo.get_by_username("ghost").await.unwrap().is_none());
    }
}
