//! JSON body extractor that also runs `validator` rules.

use axum::Json;
use axum::extract::{FromRequest, Request, rejection::JsonRejection};
use serde::de::DeserializeOwned;
use validator::Validate;

use taskgate_core::error::AppError;

use crate::error::ApiError;

/// `Json<T>` whose body has passed `T::validate`.
///
/// Both malformed bodies and failed rules render the 400 envelope.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                ApiError(AppError::validation(rejection.body_text()))
            })?;
        value.validate()?;
        Ok(ValidJson(value))
    }
}
