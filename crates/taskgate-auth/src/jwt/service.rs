//! Token service: the single entry point for issuing and checking tokens.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use taskgate_core::clock::{Clock, SystemClock};
use taskgate_core::config::auth::AuthConfig;
use taskgate_core::types::Identity;

use super::claims::Claims;
use super::decoder::JwtDecoder;
use super::encoder::{JwtEncoder, TokenPair};
use super::unverified::UnverifiedClaims;
use crate::error::AuthError;

/// Issues and verifies access and refresh tokens.
///
/// The clock drives `iat`/`exp` on issue and the unverified expiry helpers.
/// Signature and expiry verification always use the system time.
#[derive(Debug, Clone)]
pub struct TokenService {
    encoder: JwtEncoder,
    decoder: JwtDecoder,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    /// Creates a token service on the system clock.
    pub fn new(config: &AuthConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a token service issuing against the given clock.
    pub fn with_clock(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoder: JwtEncoder::new(config),
            decoder: JwtDecoder::new(config),
            clock,
        }
    }

    /// Issues an access token embedding `{id, email, role}`.
    pub fn issue_access_token(&self, identity: &Identity) -> Result<String, AuthError> {
        self.encoder
            .encode_access(identity, self.clock.now())
            .map(|(token, _)| token)
    }

    /// Issues a refresh token embedding only the subject.
    pub fn issue_refresh_token(&self, identity: &Identity) -> Result<String, AuthError> {
        self.encoder
            .encode_refresh(identity, self.clock.now())
            .map(|(token, _)| token)
    }

    /// Issues both tokens at the same instant.
    pub fn issue_token_pair(&self, identity: &Identity) -> Result<TokenPair, AuthError> {
        let now = self.clock.now();
        let (access_token, access_expires_at) = self.encoder.encode_access(identity, now)?;
        let (refresh_token, refresh_expires_at) = self.encoder.encode_refresh(identity, now)?;
        Ok(TokenPair {
            access_token,
            refresh_token,
            access_expires_at,
            refresh_expires_at,
        })
    }

    /// Verifies an access token.
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.decoder.decode_access_token(token)
    }

    /// Verifies a refresh token.
    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.decoder.decode_refresh_token(token)
    }

    /// Reads claims without any verification. Never use for access decisions.
    pub fn decode_without_verification(&self, token: &str) -> Option<UnverifiedClaims> {
        UnverifiedClaims::peek(token)
    }

    /// Whether the token is past its expiry. Undecodable tokens count as expired.
    pub fn is_expired(&self, token: &str) -> bool {
        UnverifiedClaims::peek(token).is_none_or(|c| c.is_expired_at(self.clock.now()))
    }

    /// The token's expiry, if it can be decoded.
    pub fn expiration_of(&self, token: &str) -> Option<DateTime<Utc>> {
        UnverifiedClaims::peek(token).and_then(|c| c.expires_at())
    }
}
