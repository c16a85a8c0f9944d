//! Maps domain errors to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use taskgate_auth::AuthError;
use taskgate_core::error::AppError;
use taskgate_edge::EdgeError;

/// Message rendered in place of any server-side failure.
pub const GENERIC_INTERNAL_MESSAGE: &str = "Internal server error";

/// Rejection envelope: `{success: false, error, code}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Always `false`.
    pub success: bool,
    /// Human-readable message.
    pub error: String,
    /// HTTP status code.
    pub code: u16,
    /// Structured details, e.g. retry metadata on 429.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorEnvelope {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            code: status.as_u16(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// Detail of a server-side failure, carried on the response so only the
/// outermost boundary decides whether it is shown.
#[derive(Debug, Clone)]
pub struct InternalDetail(pub String);

/// HTTP-facing wrapper around [`AppError`].
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(kind = %self.0.kind, error = %self.0.message, "Internal server error");
            let mut response =
                ErrorEnvelope::new(status, GENERIC_INTERNAL_MESSAGE).into_response_with(status);
            response
                .extensions_mut()
                .insert(InternalDetail(self.0.message));
            return response;
        }

        let mut envelope = ErrorEnvelope::new(status, self.0.message);
        if let Some(details) = self.0.details {
            envelope = envelope.with_details(details);
        }
        envelope.into_response_with(status)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self(err.into())
    }
}

impl From<EdgeError> for ApiError {
    fn from(err: EdgeError) -> Self {
        let message = err.to_string();
        Self(match err {
            EdgeError::Forbidden { .. } => AppError::authorization(message),
            _ => AppError::authentication(message),
        })
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or_default();
        Self(AppError::validation("Validation failed").with_details(details))
    }
}

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;
