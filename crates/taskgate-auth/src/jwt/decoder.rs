//! Token validation with pinned algorithm, issuer, audience, and leeway.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use taskgate_core::config::auth::AuthConfig;

use super::claims::{Claims, TokenKind};
use super::unverified::UnverifiedClaims;
use crate::error::AuthError;

/// Clock-skew allowance, in seconds. Pinned to the same value as the edge verifier.
pub const LEEWAY_SECONDS: u64 = 0;

/// Validates access and refresh tokens, each against its own secret.
#[derive(Clone)]
pub struct JwtDecoder {
    access_key: DecodingKey,
    refresh_key: DecodingKey,
    /// Validation configuration shared by both kinds.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = LEEWAY_SECONDS;
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);

        Self {
            access_key: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_key: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token.
    ///
    /// A token whose `type` names the other kind fails with
    /// [`AuthError::TokenWrongKind`] before its signature is looked at, since
    /// the two kinds are signed with different secrets. Otherwise checks, in
    /// order: signature, expiry, issuer, audience, claim shape, kind.
    pub fn decode_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.decode_kind(token, &self.access_key, TokenKind::Access)
    }

    /// Decodes and validates a refresh token.
    pub fn decode_refresh_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.decode_kind(token, &self.refresh_key, TokenKind::Refresh)
    }

    fn decode_kind(
        &self,
        token: &str,
        key: &DecodingKey,
        expected: TokenKind,
    ) -> Result<Claims, AuthError> {
        if let Some(claimed) = UnverifiedClaims::peek(token).and_then(|c| c.kind()) {
            if claimed != expected {
                debug!(expected = %expected, claimed = %claimed, "Token kind mismatch");
                return Err(AuthError::TokenWrongKind { expected });
            }
        }

        let token_data = decode::<Claims>(token, key, &self.validation).map_err(|e| {
            debug!(error = %e, expected = %expected, "Token rejected");
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::TokenInvalid,
            }
        })?;

        if token_data.claims.kind != expected {
            return Err(AuthError::TokenWrongKind { expected });
        }

        Ok(token_data.claims)
    }
}
