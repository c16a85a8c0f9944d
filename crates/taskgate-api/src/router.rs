//! Route definitions for the TaskGate HTTP API.
//!
//! Each route group gets its own [`Pipeline`]: the request logger, the
//! rate governor stage(s), then the authentication stage for that group's
//! role policy. Pipelines are attached with `route_layer`, so unmatched
//! paths never reach a stage.

use std::sync::Arc;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};

use taskgate_auth::{ADMIN_ONLY, AUTHENTICATED};

use crate::handlers;
use crate::middleware::{AuthStage, OptionalAuthStage, RateLimitStage};
use crate::pipeline::{Pipeline, run_pipeline};
use crate::state::{AppState, LOGIN_GOVERNOR};

/// Build the API router. Routes are mounted under `/api`.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(credential_routes(&state))
        .merge(refresh_routes(&state))
        .merge(health_routes(&state))
        .merge(authenticated_routes(&state))
        .merge(admin_routes(&state));

    Router::new().nest("/api", api_routes).with_state(state)
}

fn default_rate(state: &AppState) -> RateLimitStage {
    RateLimitStage::new(state.governors.default_governor()).with_policy(&state.config)
}

fn with_pipeline(router: Router<AppState>, pipeline: Pipeline) -> Router<AppState> {
    router.route_layer(axum_middleware::from_fn_with_state(
        Arc::new(pipeline),
        run_pipeline,
    ))
}

/// Credential submission: default governor, then the tighter login governor.
fn credential_routes(state: &AppState) -> Router<AppState> {
    let mut pipeline = Pipeline::new().stage(default_rate(state));
    if let Some(login) = state.governors.get(LOGIN_GOVERNOR) {
        pipeline = pipeline.stage(RateLimitStage::new(login).with_policy(&state.config));
    }

    with_pipeline(
        Router::new()
            .route("/auth/register", post(handlers::auth::register))
            .route("/auth/login", post(handlers::auth::login)),
        pipeline,
    )
}

fn refresh_routes(state: &AppState) -> Router<AppState> {
    with_pipeline(
        Router::new().route("/auth/refresh", post(handlers::auth::refresh)),
        Pipeline::new().stage(default_rate(state)),
    )
}

fn health_routes(state: &AppState) -> Router<AppState> {
    with_pipeline(
        Router::new().route("/health", get(handlers::health::health)),
        Pipeline::new()
            .stage(default_rate(state))
            .stage(OptionalAuthStage::new(state.gate.clone())),
    )
}

/// Any authenticated identity; ownership is enforced in the handlers.
fn authenticated_routes(state: &AppState) -> Router<AppState> {
    with_pipeline(
        Router::new()
            .route("/auth/me", get(handlers::auth::me))
            .route("/users/{id}", get(handlers::user::get))
            .route(
                "/tasks",
                get(handlers::task::list).post(handlers::task::create),
            )
            .route(
                "/tasks/{id}",
                get(handlers::task::get)
                    .put(handlers::task::update)
                    .delete(handlers::task::delete),
            ),
        Pipeline::new()
            .stage(default_rate(state))
            .stage(AuthStage::new(state.gate.clone(), AUTHENTICATED)),
    )
}

fn admin_routes(state: &AppState) -> Router<AppState> {
    with_pipeline(
        Router::new()
            .route("/users", get(handlers::user::list))
            .route("/admin/rate-limits", get(handlers::admin::rate_limits::stats)),
        Pipeline::new()
            .stage(default_rate(state))
            .stage(AuthStage::new(state.gate.clone(), ADMIN_ONLY)),
    )
}
