//! Auth handlers: register, login, refresh, me.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::{info, warn};

use taskgate_auth::AuthError;
use taskgate_core::error::AppError;
use taskgate_core::types::{Identity, NewIdentity, Role};

use crate::dto::request::{LoginRequest, RefreshRequest, RegisterRequest};
use crate::dto::response::{ApiResponse, AuthResponse};
use crate::error::ApiResult;
use crate::extractors::{CurrentUser, ValidJson};
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<AuthResponse>>)> {
    let credential_hash = state.hasher.hash(&req.password)?;
    let user = state
        .identities
        .create(NewIdentity {
            name: req.name,
            email: req.email,
            credential_hash,
            role: Role::User,
        })
        .await?;
    let tokens = state.tokens.issue_token_pair(&user)?;

    info!(user_id = %user.id, "Identity registered");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(AuthResponse { user, tokens })),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> ApiResult<Json<ApiResponse<AuthResponse>>> {
    let Some(stored) = state.identities.find_by_email(&req.email).await? else {
        warn!("Login for unknown email");
        return Err(AppError::authentication(INVALID_CREDENTIALS).into());
    };
    if !state.hasher.compare(&req.password, &stored.credential_hash)? {
        warn!(user_id = %stored.identity.id, "Login with wrong credential");
        return Err(AppError::authentication(INVALID_CREDENTIALS).into());
    }

    let user = stored.identity;
    let tokens = state.tokens.issue_token_pair(&user)?;
    info!(user_id = %user.id, "Login succeeded");
    Ok(Json(ApiResponse::ok(AuthResponse { user, tokens })))
}

/// POST /api/auth/refresh
///
/// The identity is re-read so a deleted account cannot keep refreshing.
pub async fn refresh(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<RefreshRequest>,
) -> ApiResult<Json<ApiResponse<AuthResponse>>> {
    let claims = state.tokens.verify_refresh_token(&req.refresh_token)?;
    let user = state
        .identities
        .find_by_id(claims.user_id())
        .await?
        .ok_or(AuthError::IdentityNotFound)?;
    let tokens = state.tokens.issue_token_pair(&user)?;
    Ok(Json(ApiResponse::ok(AuthResponse { user, tokens })))
}

/// GET /api/auth/me
pub async fn me(CurrentUser(user): CurrentUser) -> Json<ApiResponse<Identity>> {
    Json(ApiResponse::ok(user))
}
