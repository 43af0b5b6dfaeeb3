//! HTTP request handlers.

pub mod auth;
pub mod conversation;
pub mod message;
