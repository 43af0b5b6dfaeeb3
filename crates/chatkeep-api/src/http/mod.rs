//! HTTP layer for Chatkeep.
//!
//! Axum routes for registration, login, message submission, and
//! conversation history, with session-token authentication and a flat
//! `{"status": ...}` response shape.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;
