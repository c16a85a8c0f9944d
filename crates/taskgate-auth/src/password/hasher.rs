//! Argon2id credential hashing and comparison.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use tracing::warn;

use taskgate_core::error::AppError;
use taskgate_core::result::AppResult;
use taskgate_core::traits::CredentialHasher;

/// Argon2id implementation of [`CredentialHasher`].
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Creates a new hasher.
    pub fn new() -> Self {
        Self
    }
}

impl CredentialHasher for PasswordHasher {
    fn hash(&self, plaintext: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::internal(format!("Credential hashing failed: {e}")))
    }

    /// A digest that does not parse compares as a mismatch rather than an error,
    /// so a corrupt row cannot be told apart from a wrong secret.
    fn compare(&self, plaintext: &str, digest: &str) -> AppResult<bool> {
        let parsed = match PasswordHash::new(digest) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "Stored credential digest is malformed");
                return Ok(false);
            }
        };

        match Argon2::default().verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!(
                "Credential comparison failed: {e}"
            ))),
        }
    }
}
