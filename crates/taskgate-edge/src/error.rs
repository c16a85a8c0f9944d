//! Edge rejection reasons.

use http::StatusCode;
use thiserror::Error;

/// Why the edge refused a request.
///
/// Messages match the primary gate's so clients see one vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EdgeError {
    #[error("No token provided")]
    TokenMissing,
    #[error("Token has expired")]
    TokenExpired,
    #[error("Invalid token")]
    TokenInvalid,
    #[error("Invalid token type: expected access token")]
    TokenWrongKind,
    #[error("Access denied. Required role: {required}")]
    Forbidden { required: String },
}

impl EdgeError {
    /// HTTP status for the rejection.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}
