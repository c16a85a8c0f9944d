//! Caller identity as supplied by the identity store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::role::Role;

/// The record attached to a request after successful authentication.
///
/// Always read fresh from the identity store; never reconstructed from
/// token claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Unique identifier (token subject).
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email address, unique per identity.
    pub email: String,
    /// Assigned role.
    pub role: Role,
    /// When the identity was created.
    pub created_at: DateTime<Utc>,
    /// When the identity was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Identity {
    /// Check if this identity has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// An identity together with its stored credential digest.
///
/// Returned only by credential lookups; the digest must never leave the
/// login path.
#[derive(Debug, Clone)]
pub struct StoredCredential {
    /// The identity the credential belongs to.
    pub identity: Identity,
    /// One-way hash of the secret.
    pub credential_hash: String,
}

/// Fields required to create a new identity.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Pre-hashed credential.
    pub credential_hash: String,
    /// Assigned role.
    pub role: Role,
}
