//! Perimeter gate: classify, verify, forward a minimal identity.

use http::{HeaderMap, HeaderValue, Method, header::AUTHORIZATION};
use tracing::debug;

use crate::error::EdgeError;
use crate::routes::{RouteClass, RouteTable};
use crate::verifier::{EdgeClaims, EdgeRole, EdgeVerifier};

pub const HEADER_USER_ID: &str = "x-user-id";
pub const HEADER_USER_EMAIL: &str = "x-user-email";
pub const HEADER_USER_ROLE: &str = "x-user-role";

/// Outcome of an admitted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeDecision {
    /// Public route; nothing was verified.
    Public,
    /// Verified caller.
    Authenticated(EdgeClaims),
}

impl EdgeDecision {
    /// Rewrites the identity headers for the upstream request.
    ///
    /// Client-supplied identity headers are always removed first.
    pub fn forward(&self, headers: &mut HeaderMap) {
        headers.remove(HEADER_USER_ID);
        headers.remove(HEADER_USER_EMAIL);
        headers.remove(HEADER_USER_ROLE);

        let Self::Authenticated(claims) = self else {
            return;
        };
        if let Ok(id) = HeaderValue::from_str(&claims.id.to_string()) {
            headers.insert(HEADER_USER_ID, id);
        }
        if let Some(email) = claims
            .email
            .as_deref()
            .and_then(|e| HeaderValue::from_str(e).ok())
        {
            headers.insert(HEADER_USER_EMAIL, email);
        }
        headers.insert(
            HEADER_USER_ROLE,
            HeaderValue::from_static(claims.role.as_str()),
        );
    }
}

/// Edge analogue of the primary authentication gate.
#[derive(Debug, Clone)]
pub struct EdgeGate {
    verifier: EdgeVerifier,
    routes: RouteTable,
}

impl EdgeGate {
    pub fn new(verifier: EdgeVerifier, routes: RouteTable) -> Self {
        Self { verifier, routes }
    }

    /// Decides a request from its method, path, and headers.
    pub fn check(
        &self,
        method: &Method,
        path: &str,
        headers: &HeaderMap,
    ) -> Result<EdgeDecision, EdgeError> {
        let class = self.routes.classify(method, path);
        if class == RouteClass::Public {
            return Ok(EdgeDecision::Public);
        }

        let token = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(EdgeError::TokenMissing)?;

        let claims = self.verifier.verify(token)?;

        if class == RouteClass::AdminOnly && claims.role != EdgeRole::Admin {
            debug!(user_id = %claims.id, %method, path, "Edge denied non-admin");
            return Err(EdgeError::Forbidden {
                required: EdgeRole::Admin.as_str().to_string(),
            });
        }

        Ok(EdgeDecision::Authenticated(claims))
    }
}
