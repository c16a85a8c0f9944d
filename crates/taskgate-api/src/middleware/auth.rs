//! Authentication gate stages.
//!
//! On success the resolved `Identity` is attached to the request
//! extensions, where the `CurrentUser` / `OptionalUser` extractors read it.

use async_trait::async_trait;
use axum::http::header::AUTHORIZATION;
use axum::response::IntoResponse;

use taskgate_auth::AuthGate;
use taskgate_core::error::AppError;
use taskgate_core::types::Role;

use crate::error::ApiError;
use crate::pipeline::{Flow, Stage, StageContext};

/// Owned so no borrow of the request is held across the gate's await.
fn authorization(ctx: &StageContext) -> Option<String> {
    ctx.request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

/// Requires a valid access token whose identity holds one of `allowed`.
#[derive(Debug, Clone)]
pub struct AuthStage {
    gate: AuthGate,
    allowed: &'static [Role],
}

impl AuthStage {
    /// An empty `allowed` list admits any authenticated identity.
    pub fn new(gate: AuthGate, allowed: &'static [Role]) -> Self {
        Self { gate, allowed }
    }
}

#[async_trait]
impl Stage for AuthStage {
    fn name(&self) -> &'static str {
        "auth"
    }

    async fn handle(&self, ctx: &mut StageContext) -> Result<Flow, AppError> {
        let header = authorization(ctx);
        match self.gate.authenticate(header.as_deref(), self.allowed).await {
            Ok(identity) => {
                ctx.request.extensions_mut().insert(identity);
                Ok(Flow::Continue)
            }
            Err(err) => Ok(Flow::Respond(ApiError::from(err).into_response())),
        }
    }
}

/// Attaches the identity when a valid token is present. Never rejects.
#[derive(Debug, Clone)]
pub struct OptionalAuthStage {
    gate: AuthGate,
}

impl OptionalAuthStage {
    pub fn new(gate: AuthGate) -> Self {
        Self { gate }
    }
}

#[async_trait]
impl Stage for OptionalAuthStage {
    fn name(&self) -> &'static str {
        "optional_auth"
    }

    async fn handle(&self, ctx: &mut StageContext) -> Result<Flow, AppError> {
        let header = authorization(ctx);
        if let Some(identity) = self.gate.authenticate_optional(header.as_deref()).await {
            ctx.request.extensions_mut().insert(identity);
        }
        Ok(Flow::Continue)
    }
}
