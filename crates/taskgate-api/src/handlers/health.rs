//! Health check handler.

use axum::Json;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::extractors::OptionalUser;

/// GET /api/health
pub async fn health(OptionalUser(user): OptionalUser) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        authenticated: user.is_some(),
    }))
}
