//! Token creation with per-kind signing secrets and TTLs.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use taskgate_core::config::auth::AuthConfig;
use taskgate_core::types::Identity;

use super::claims::{Claims, TokenKind};
use crate::error::AuthError;

/// Creates signed access and refresh tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC key for access tokens.
    access_key: EncodingKey,
    /// HMAC key for refresh tokens.
    refresh_key: EncodingKey,
    issuer: String,
    audience: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

/// A freshly issued access + refresh pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Short-lived access token.
    pub access_token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
    /// Access token expiration timestamp.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration timestamp.
    pub refresh_expires_at: DateTime<Utc>,
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            access_key: EncodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_key: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            access_ttl: Duration::minutes(config.access_ttl_minutes as i64),
            refresh_ttl: Duration::days(config.refresh_ttl_days as i64),
        }
    }

    /// Signs an access token carrying `{id, email, role}`.
    pub fn encode_access(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> Result<(String, DateTime<Utc>), AuthError> {
        let exp = now + self.access_ttl;
        let claims = Claims {
            id: identity.id,
            email: Some(identity.email.clone()),
            role: Some(identity.role),
            roles: None,
            kind: TokenKind::Access,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        let token = self.sign(&claims, &self.access_key)?;
        debug!(user_id = %identity.id, "Issued access token");
        Ok((token, exp))
    }

    /// Signs a refresh token carrying only the subject.
    pub fn encode_refresh(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> Result<(String, DateTime<Utc>), AuthError> {
        let exp = now + self.refresh_ttl;
        let claims = Claims {
            id: identity.id,
            email: None,
            role: None,
            roles: None,
            kind: TokenKind::Refresh,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        let token = self.sign(&claims, &self.refresh_key)?;
        debug!(user_id = %identity.id, "Issued refresh token");
        Ok((token, exp))
    }

    fn sign(&self, claims: &Claims, key: &EncodingKey) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, key).map_err(|e| {
            error!(error = %e, kind = %claims.kind, "Failed to sign token");
            AuthError::Signing
        })
    }
}
