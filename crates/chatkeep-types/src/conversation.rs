//! Conversation and message types.
//!
//! A conversation is the unit of storage: its messages are an ordered
//! sequence serialized into a single payload, never addressed one by one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::user::UserId;

/// Placeholder title for conversations created without one.
pub const DEFAULT_TITLE: &str = "New Conversation";

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

/// A single role/content pair within a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    /// Client-supplied send time in epoch seconds, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

impl Message {
    /// A user-authored message with no timestamp.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            timestamp: None,
        }
    }

    /// An assistant-authored message with no timestamp.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            timestamp: None,
        }
    }
}

/// A full conversation record, visible only to its owner.
#[derive(Debug, Clone, Serialize)]
pub struct Conversation {
    pub id: String,
    pub user_id: UserId,
    pub title: String,
    pub messages: Vec<Message>,
    pub updated_at: DateTime<Utc>,
}

/// The listing projection of a conversation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationSummary {
    pub id: String,
    pub title: String,
    pub updated_at: DateTime<Utc>,
}

/// One page of a filtered conversation listing plus the total match count.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationPage {
    pub items: Vec<ConversationSummary>,
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
}

/// Result of appending a message through the send-message flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppendOutcome {
    pub conversation_id: String,
    /// True when the append created the conversation.
    pub created: bool,
}
