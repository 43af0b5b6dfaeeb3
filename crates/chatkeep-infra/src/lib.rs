//! Infrastructure layer for Chatkeep.
//!
//! Contains implementations of the repository traits defined in `chatkeep-core`:
//! SQLite storage, salted password hashing, and configuration loading.

pub mod config;
pub mod crypto;
pub mod sqlite;
