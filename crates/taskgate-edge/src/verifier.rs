//! Access-token verification over raw HMAC-SHA256.
//!
//! Rule order, first failure wins:
//!
//! 1. payload names a kind other than `access` → wrong kind
//! 2. three base64url segments, a well-formed header whose `alg` is `HS256`
//! 3. signature over `header.payload`
//! 4. full claim shape (`id`/`sub`, `type`, `iss`, `aud`, `iat`, `exp`,
//!    optional `email`/`role`/`roles`), duplicate keys rejected
//! 5. `exp < now - leeway` → expired
//! 6. `iss`, then `aud`, match the pinned values
//! 7. `type` is `access` → otherwise wrong kind
//!
//! Everything other than 1, 5 and 7 is reported as an invalid token.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use serde::de::IgnoredAny;
use sha2::Sha256;
use tracing::debug;
use uuid::Uuid;

use crate::error::EdgeError;
use crate::header::{Algorithm, JoseHeader};

type HmacSha256 = Hmac<Sha256>;

/// Clock-skew allowance, in seconds. Pinned to the same value as the primary verifier.
pub const LEEWAY_SECONDS: i64 = 0;

/// Role as seen by the edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum EdgeRole {
    #[default]
    #[serde(alias = "user")]
    User,
    #[serde(alias = "admin")]
    Admin,
}

impl EdgeRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Admin => "Admin",
        }
    }
}

/// Minimal identity derived from a verified access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeClaims {
    pub id: Uuid,
    pub email: Option<String>,
    /// `role`, else the first of `roles`, else `User`.
    pub role: EdgeRole,
    pub exp: i64,
}

/// Lenient read of the payload used only for the kind pre-check.
#[derive(Deserialize)]
#[allow(dead_code)]
struct Peeked {
    #[serde(default, alias = "sub")]
    id: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default, rename = "type")]
    token_type: Option<String>,
    #[serde(default)]
    iat: Option<i64>,
    #[serde(default)]
    exp: Option<i64>,
}

#[derive(Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum WireKind {
    Access,
    Refresh,
}

/// Payload read straight from the decoded bytes, so a repeated key fails
/// instead of silently keeping the last value.
#[derive(Deserialize)]
#[allow(dead_code)]
struct WireClaims {
    #[serde(alias = "sub")]
    id: Uuid,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<EdgeRole>,
    #[serde(default)]
    roles: Option<Vec<EdgeRole>>,
    #[serde(rename = "type")]
    kind: WireKind,
    iss: String,
    aud: String,
    iat: i64,
    exp: i64,
    /// Not validated, but a repeated `nbf` still makes the payload invalid.
    #[serde(default)]
    nbf: Option<IgnoredAny>,
}

/// Verifies access tokens against a pinned secret, issuer, and audience.
#[derive(Clone)]
pub struct EdgeVerifier {
    secret: Vec<u8>,
    issuer: String,
    audience: String,
}

impl std::fmt::Debug for EdgeVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdgeVerifier")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}

impl EdgeVerifier {
    pub fn new(
        secret: impl Into<Vec<u8>>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Self {
        Self {
            secret: secret.into(),
            issuer: issuer.into(),
            audience: audience.into(),
        }
    }

    /// Verifies an access token against the system clock.
    pub fn verify(&self, token: &str) -> Result<EdgeClaims, EdgeError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verifies an access token as of `now` (seconds since epoch).
    pub fn verify_at(&self, token: &str, now: i64) -> Result<EdgeClaims, EdgeError> {
        if let Some(kind) = peek_kind(token) {
            if kind != "access" {
                debug!(claimed = %kind, "Edge token kind mismatch");
                return Err(EdgeError::TokenWrongKind);
            }
        }

        let mut segments = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(EdgeError::TokenInvalid);
        };

        let header = decode_segment(header)
            .and_then(|bytes| JoseHeader::from_slice(&bytes))
            .ok_or(EdgeError::TokenInvalid)?;
        if header.alg != Algorithm::HS256 {
            debug!(alg = ?header.alg, "Edge rejected algorithm");
            return Err(EdgeError::TokenInvalid);
        }

        self.check_signature(token, signature)?;

        let payload = decode_segment(payload).ok_or(EdgeError::TokenInvalid)?;
        let claims: WireClaims =
            serde_json::from_slice(&payload).map_err(|_| EdgeError::TokenInvalid)?;

        if claims.exp < 0 {
            return Err(EdgeError::TokenInvalid);
        }
        if claims.exp < now - LEEWAY_SECONDS {
            return Err(EdgeError::TokenExpired);
        }
        if claims.iss != self.issuer || claims.aud != self.audience {
            return Err(EdgeError::TokenInvalid);
        }
        if claims.kind != WireKind::Access {
            return Err(EdgeError::TokenWrongKind);
        }

        let role = claims
            .role
            .or_else(|| claims.roles.as_ref().and_then(|r| r.first().copied()))
            .unwrap_or_default();

        Ok(EdgeClaims {
            id: claims.id,
            email: claims.email,
            role,
            exp: claims.exp,
        })
    }

    fn check_signature(&self, token: &str, signature: &str) -> Result<(), EdgeError> {
        let signature = decode_segment(signature).ok_or(EdgeError::TokenInvalid)?;
        let signing_input = token
            .rsplit_once('.')
            .map(|(input, _)| input)
            .ok_or(EdgeError::TokenInvalid)?;
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).map_err(|_| EdgeError::TokenInvalid)?;
        mac.update(signing_input.as_bytes());
        mac.verify_slice(&signature).map_err(|_| {
            debug!("Edge signature mismatch");
            EdgeError::TokenInvalid
        })
    }
}

fn decode_segment(segment: &str) -> Option<Vec<u8>> {
    URL_SAFE_NO_PAD.decode(segment).ok()
}

fn peek_kind(token: &str) -> Option<String> {
    let mut segments = token.split('.');
    let (_, payload, _, None) = (
        segments.next()?,
        segments.next()?,
        segments.next()?,
        segments.next(),
    ) else {
        return None;
    };
    let peeked: Peeked = serde_json::from_slice(&decode_segment(payload)?).ok()?;
    peeked
        .token_type
        .filter(|kind| kind == "access" || kind == "refresh")
}
