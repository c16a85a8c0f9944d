//! One-way credential hashing collaborator.

use crate::result::AppResult;

/// Hashes secrets and compares plaintext against stored digests.
pub trait CredentialHasher: Send + Sync + 'static {
    /// Produce a digest for the given plaintext.
    fn hash(&self, plaintext: &str) -> AppResult<String>;

    /// Returns `Ok(true)` when the plaintext matches the digest.
    fn compare(&self, plaintext: &str, digest: &str) -> AppResult<bool>;
}
