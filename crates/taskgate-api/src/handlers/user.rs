//! Identity lookup handlers.

use axum::Json;
use axum::extract::{Path, State};

use taskgate_auth::is_owner_or_admin;
use taskgate_core::error::AppError;
use taskgate_core::types::Identity;

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{CurrentUser, parse_uuid};
use crate::state::AppState;

/// GET /api/users (admin)
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<ApiResponse<Vec<Identity>>>> {
    let users = state.identities.list().await?;
    Ok(Json(ApiResponse::ok(users)))
}

/// GET /api/users/{id}
pub async fn get(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Identity>>> {
    let id = parse_uuid(&id)?;
    if !is_owner_or_admin(&caller, id) {
        return Err(AppError::authorization("Access denied").into());
    }
    let user = state
        .identities
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(Json(ApiResponse::ok(user)))
}
