//! Token signing configuration.

use serde::{Deserialize, Serialize};

/// Token signing secrets, claim contract, and lifetimes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC-SHA256 secret for access tokens. Shared with the edge gate.
    #[serde(default = "default_access_secret")]
    pub access_secret: String,
    /// HMAC-SHA256 secret for refresh tokens. Must differ from `access_secret`.
    #[serde(default = "default_refresh_secret")]
    pub refresh_secret: String,
    /// `iss` claim pinned on issue and verify.
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// `aud` claim pinned on issue and verify.
    #[serde(default = "default_audience")]
    pub audience: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// Refresh token TTL in days.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_days: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_secret: default_access_secret(),
            refresh_secret: default_refresh_secret(),
            issuer: default_issuer(),
            audience: default_audience(),
            access_ttl_minutes: default_access_ttl(),
            refresh_ttl_days: default_refresh_ttl(),
        }
    }
}

impl AuthConfig {
    /// Whether either secret is still the checked-in placeholder.
    pub fn uses_placeholder_secret(&self) -> bool {
        self.access_secret == default_access_secret()
            || self.refresh_secret == default_refresh_secret()
    }
}

fn default_access_secret() -> String {
    "CHANGE_ME_ACCESS_SECRET".to_string()
}

fn default_refresh_secret() -> String {
    "CHANGE_ME_REFRESH_SECRET".to_string()
}

fn default_issuer() -> String {
    "taskgate-api".to_string()
}

fn default_audience() -> String {
    "taskgate-client".to_string()
}

fn default_access_ttl() -> u64 {
    15
}

fn default_refresh_ttl() -> u64 {
    7
}
