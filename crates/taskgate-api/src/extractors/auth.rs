//! Identity extractors. The auth stages do the verifying; these only read
//! the [`Identity`] they attached.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use taskgate_core::error::AppError;
use taskgate_core::types::Identity;

use crate::error::ApiError;

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

impl std::ops::Deref for CurrentUser {
    type Target = Identity;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| {
                // Route mounted without an auth stage.
                ApiError(AppError::internal("No identity attached to request"))
            })
    }
}

/// The caller, if an optional-auth stage recognised one.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<Identity>);

impl<S: Send + Sync> FromRequestParts<S> for OptionalUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalUser(parts.extensions.get::<Identity>().cloned()))
    }
}
