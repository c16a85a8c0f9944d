//! Claims carried by access and refresh tokens.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use taskgate_core::types::Role;

/// Distinguishes access tokens from refresh tokens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived token for API requests.
    Access,
    /// Long-lived token exchanged only for a new pair.
    Refresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Access => write!(f, "access"),
            Self::Refresh => write!(f, "refresh"),
        }
    }
}

/// Verified claim set.
///
/// Only ever produced by [`JwtDecoder`](super::JwtDecoder); the unverified
/// counterpart is [`UnverifiedClaims`](super::UnverifiedClaims).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject identifier. `sub` is accepted on decode.
    #[serde(alias = "sub")]
    pub id: Uuid,
    /// Email, access tokens only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Role, access tokens only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Multi-role spelling accepted on decode; never issued.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<Role>>,
    /// Token kind.
    #[serde(rename = "type")]
    pub kind: TokenKind,
    /// Issuer.
    pub iss: String,
    /// Audience.
    pub aud: String,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

impl Claims {
    /// Returns the subject identifier.
    pub fn user_id(&self) -> Uuid {
        self.id
    }

    /// Role named by the token: `role`, else the first of `roles`.
    pub fn claimed_role(&self) -> Option<Role> {
        self.role
            .or_else(|| self.roles.as_ref().and_then(|r| r.first().copied()))
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}
