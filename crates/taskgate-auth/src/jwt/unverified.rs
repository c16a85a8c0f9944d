//! Best-effort claim extraction without signature or expiry checks.
//!
//! Used for log correlation and expiry hints only. Nothing here may feed an
//! access decision; the verified path is [`JwtDecoder`](super::JwtDecoder).

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::claims::TokenKind;

/// Claims read from a token payload that has NOT been verified.
///
/// Every field is optional so that expired or foreign tokens still yield
/// whatever they carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UnverifiedClaims {
    /// Subject identifier, as written in the token.
    #[serde(default, alias = "sub")]
    pub id: Option<String>,
    /// Email, if present.
    #[serde(default)]
    pub email: Option<String>,
    /// Raw `type` claim.
    #[serde(default, rename = "type")]
    pub token_type: Option<String>,
    /// Issued-at, seconds since epoch.
    #[serde(default)]
    pub iat: Option<i64>,
    /// Expiry, seconds since epoch.
    #[serde(default)]
    pub exp: Option<i64>,
}

impl UnverifiedClaims {
    /// Reads the payload segment of a compact token.
    ///
    /// Returns `None` unless the token has exactly three segments and the
    /// middle one is base64url JSON.
    pub fn peek(token: &str) -> Option<Self> {
        let mut segments = token.split('.');
        let (_header, payload, _signature) =
            (segments.next()?, segments.next()?, segments.next()?);
        if segments.next().is_some() {
            return None;
        }
        let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// The token kind, if the `type` claim names one.
    pub fn kind(&self) -> Option<TokenKind> {
        match self.token_type.as_deref() {
            Some("access") => Some(TokenKind::Access),
            Some("refresh") => Some(TokenKind::Refresh),
            _ => None,
        }
    }

    /// Expiry as a timestamp, if present.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }

    /// Whether the token is past its expiry at `now`. A missing `exp` counts as expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.exp {
            Some(exp) => exp < now.timestamp(),
            None => true,
        }
    }
}
