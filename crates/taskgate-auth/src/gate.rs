//! Authentication gate: token verification, identity lookup, role allow-list.

use std::sync::Arc;

use tracing::{debug, error};

use taskgate_core::traits::IdentityStore;
use taskgate_core::types::{Identity, Role};

use crate::error::AuthError;
use crate::jwt::TokenService;
use crate::rbac::require_role;

/// Extracts the credential from an `Authorization: Bearer <token>` value.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    header
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Decides whether a request may reach its handler.
///
/// The identity is always re-read from the store; token claims are never
/// trusted for the role.
#[derive(Clone)]
pub struct AuthGate {
    tokens: Arc<TokenService>,
    identities: Arc<dyn IdentityStore>,
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate").finish_non_exhaustive()
    }
}

impl AuthGate {
    /// Creates a gate over the given token service and identity store.
    pub fn new(tokens: Arc<TokenService>, identities: Arc<dyn IdentityStore>) -> Self {
        Self { tokens, identities }
    }

    /// Authenticates the caller from the raw `Authorization` header value.
    ///
    /// Steps run in order and the first failure wins: bearer present, access
    /// token verifies, subject exists, role in `allowed` (empty admits all).
    /// A failing identity store denies with [`AuthError::UpstreamUnexpected`].
    pub async fn authenticate(
        &self,
        authorization: Option<&str>,
        allowed: &[Role],
    ) -> Result<Identity, AuthError> {
        let token = bearer_token(authorization).ok_or(AuthError::TokenMissing)?;
        let claims = self.tokens.verify_access_token(token)?;

        let identity = match self.identities.find_by_id(claims.user_id()).await {
            Ok(Some(identity)) => identity,
            Ok(None) => {
                debug!(user_id = %claims.user_id(), "Token subject no longer exists");
                return Err(AuthError::IdentityNotFound);
            }
            Err(e) => {
                error!(error = %e, user_id = %claims.user_id(), "Identity lookup failed");
                return Err(AuthError::UpstreamUnexpected);
            }
        };

        require_role(&identity, allowed).inspect_err(|_| {
            debug!(user_id = %identity.id, role = %identity.role, "Role not in allow-list");
        })?;

        Ok(identity)
    }

    /// Like [`authenticate`](Self::authenticate) with no role list, but never
    /// rejects: any failure yields `None`.
    pub async fn authenticate_optional(&self, authorization: Option<&str>) -> Option<Identity> {
        bearer_token(authorization)?;
        self.authenticate(authorization, &[]).await.ok()
    }
}
