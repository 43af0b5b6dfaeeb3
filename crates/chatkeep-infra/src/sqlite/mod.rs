//! SQLite storage layer.
//!
//! Repository implementations backed by SQLite with WAL mode and split
//! read/write connection pools.

pub mod conversation;
pub mod pool;
pub mod session;
pub mod user;

use chatkeep_types::timestamp::{from_epoch_seconds, to_epoch_seconds};
use chatkeep_types::error::RepositoryError;
use chrono::{DateTime, Utc};

/// Decode a `REAL` epoch-seconds column.
pub(crate) fn parse_timestamp(secs: f64) -> Result<DateTime<Utc>, RepositoryError> {
    from_epoch_seconds(secs)
        .ok_or_else(|| RepositoryError::Query(format!("invalid timestamp: {secs}")))
}

/// Encode a timestamp for a `REAL` epoch-seconds column.
pub(crate) fn format_timestamp(dt: &DateTime<Utc>) -> f64 {
    to_epoch_seconds(dt)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::pool::DatabasePool;

    /// Open a fresh database in a temp directory.
    pub async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }
}
