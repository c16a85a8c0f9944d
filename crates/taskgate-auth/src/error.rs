//! Authentication failure taxonomy.

use thiserror::Error;

use taskgate_core::error::AppError;

use crate::jwt::TokenKind;

/// Every way the token service or the gate can refuse a caller.
///
/// Display strings are caller-facing and never carry signing-library detail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No bearer credential on the request.
    #[error("No token provided")]
    TokenMissing,
    /// Signature valid but `exp` is in the past.
    #[error("Token has expired")]
    TokenExpired,
    /// Bad signature, malformed token, or issuer/audience/claim mismatch.
    #[error("Invalid token")]
    TokenInvalid,
    /// Token verified but is of the other kind.
    #[error("Invalid token type: expected {expected} token")]
    TokenWrongKind {
        /// The kind the caller asked for.
        expected: TokenKind,
    },
    /// Token subject no longer exists in the identity store.
    #[error("User not found")]
    IdentityNotFound,
    /// Caller's role is not in the allow-list.
    #[error("Access denied. Required role: {required}")]
    RoleForbidden {
        /// Human-readable allow-list, e.g. `Admin` or `User, Admin`.
        required: String,
    },
    /// A collaborator failed while the gate was deciding.
    #[error("Authentication failed")]
    UpstreamUnexpected,
    /// Token could not be signed.
    #[error("Failed to issue token")]
    Signing,
}

impl AuthError {
    /// Whether this failure is an authorization (403) rather than authentication (401) failure.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::RoleForbidden { .. })
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::RoleForbidden { .. } => AppError::authorization(err.to_string()),
            AuthError::Signing => AppError::internal(err.to_string()),
            _ => AppError::authentication(err.to_string()),
        }
    }
}
