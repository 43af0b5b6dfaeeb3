//! Business logic and repository trait definitions for Chatkeep.
//!
//! This crate defines the "ports" (repository traits) that the infrastructure
//! layer implements, plus the identity and conversation services built on
//! them. It depends only on `chatkeep-types` -- never on `chatkeep-infra` or
//! any database/IO crate.

pub mod repository;
pub mod service;
