//! Login session records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::user::UserId;

/// A bearer-token session binding a token to its owning user.
///
/// Validity is evaluated lazily: a session is active only while the current
/// time is strictly before `expires_at`. Expired rows are not swept on lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

impl AuthSession {
    /// Whether the session grants access at `now`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// The result of a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginGrant {
    pub token: String,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}
