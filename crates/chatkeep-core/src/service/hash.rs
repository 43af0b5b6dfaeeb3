//! PasswordHasher trait for salted credential hashing.
//!
//! Defined in chatkeep-core so the identity service can hash passwords
//! without coupling to a specific algorithm. The `SaltedSha256Hasher`
//! adapter lives in chatkeep-infra.

/// Abstraction over salted one-way password hashing.
pub trait PasswordHasher: Send + Sync {
    /// Produce a fresh random salt, encoded as text for storage.
    fn generate_salt(&self) -> String;

    /// Hash `password` combined with `salt`.
    fn hash(&self, password: &str, salt: &str) -> String;

    /// Recompute the hash with the stored salt and compare.
    fn verify(&self, password: &str, salt: &str, expected_hash: &str) -> bool {
        self.hash(password, salt) == expected_hash
    }
}
