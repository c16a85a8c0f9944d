//! Task CRUD handlers.
//!
//! Every route here sits behind the authentication gate; ownership is
//! checked per task.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use taskgate_auth::is_owner_or_admin;
use taskgate_core::error::AppError;
use taskgate_core::types::Identity;

use crate::dto::request::{CreateTaskRequest, UpdateTaskRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{CurrentUser, ValidJson, parse_uuid};
use crate::state::AppState;
use crate::store::{Task, TaskChanges};

/// Loads a task the caller may touch.
async fn owned_task(state: &AppState, caller: &Identity, id: &str) -> Result<Task, AppError> {
    let id = parse_uuid(id)?;
    let task = state
        .tasks
        .get(id)
        .await
        .ok_or_else(|| AppError::not_found("Task not found"))?;
    if !is_owner_or_admin(caller, task.owner_id) {
        return Err(AppError::authorization("Access denied"));
    }
    Ok(task)
}

/// GET /api/tasks
pub async fn list(
    State(state): State<AppState>,
    caller: CurrentUser,
) -> Json<ApiResponse<Vec<Task>>> {
    let tasks = if caller.is_admin() {
        state.tasks.list_all().await
    } else {
        state.tasks.list_by_owner(caller.id).await
    };
    Json(ApiResponse::ok(tasks))
}

/// POST /api/tasks
pub async fn create(
    State(state): State<AppState>,
    caller: CurrentUser,
    ValidJson(req): ValidJson<CreateTaskRequest>,
) -> (StatusCode, Json<ApiResponse<Task>>) {
    let task = state
        .tasks
        .create(caller.id, req.title, req.description)
        .await;
    (StatusCode::CREATED, Json(ApiResponse::ok(task)))
}

/// GET /api/tasks/{id}
pub async fn get(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Task>>> {
    let task = owned_task(&state, &caller, &id).await?;
    Ok(Json(ApiResponse::ok(task)))
}

/// PUT /api/tasks/{id}
pub async fn update(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<UpdateTaskRequest>,
) -> ApiResult<Json<ApiResponse<Task>>> {
    let task = owned_task(&state, &caller, &id).await?;
    let updated = state
        .tasks
        .update(
            task.id,
            TaskChanges {
                title: req.title,
                description: req.description,
                completed: req.completed,
            },
        )
        .await
        .ok_or_else(|| AppError::not_found("Task not found"))?;
    Ok(Json(ApiResponse::ok(updated)))
}

/// DELETE /api/tasks/{id}
pub async fn delete(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    let task = owned_task(&state, &caller, &id).await?;
    state
        .tasks
        .delete(task.id)
        .await
        .ok_or_else(|| AppError::not_found("Task not found"))?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Task deleted".to_string(),
    })))
}
