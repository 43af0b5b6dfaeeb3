//! Cryptographic operations for Chatkeep.
//!
//! - `hash`: salted SHA-256 password hashing

pub mod hash;
