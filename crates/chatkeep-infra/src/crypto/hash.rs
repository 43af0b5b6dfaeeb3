//! Salted SHA-256 password hashing.
//!
//! Implements the `PasswordHasher` trait from `chatkeep-core` using the
//! `sha2` crate (RustCrypto ecosystem). Salts come from the OS RNG.

use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

use chatkeep_core::service::hash::PasswordHasher;

/// Salt length in bytes before hex encoding.
pub const SALT_BYTES: usize = 16;

/// SHA-256 over `password || salt`, rendered as lowercase hex.
pub struct SaltedSha256Hasher;

impl SaltedSha256Hasher {
    /// Create a new hasher.
    pub fn new() -> Self {
        Self
    }
}

impl Default for SaltedSha256Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for SaltedSha256Hasher {
    fn generate_salt(&self) -> String {
        let mut bytes = [0u8; SALT_BYTES];
        OsRng.fill_bytes(&mut bytes);
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    fn hash(&self, password: &str, salt: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(password.as_bytes());
        hasher.update(salt.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}
