//! Rate governor inspection.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, RateLimitStatsResponse};
use crate::state::AppState;

/// GET /api/admin/rate-limits
pub async fn stats(State(state): State<AppState>) -> Json<ApiResponse<RateLimitStatsResponse>> {
    Json(ApiResponse::ok(RateLimitStatsResponse {
        governors: state.governors.stats(),
    }))
}
