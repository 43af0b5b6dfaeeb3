//! Shared domain types for Chatkeep.
//!
//! This crate contains the core domain types used across the Chatkeep store:
//! User, AuthSession, Conversation, Message, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod conversation;
pub mod error;
pub mod session;
pub mod timestamp;
pub mod user;
