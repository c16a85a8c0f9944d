//! Integration tests with the edge gate mounted in front of the router.

use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;

use taskgate_auth::TokenService;
use taskgate_core::clock::ManualClock;
use taskgate_core::config::AppConfig;
use taskgate_core::types::Role;

use crate::helpers::TestApp;

fn edge_app() -> TestApp {
    let mut config = AppConfig::default();
    config.edge.enabled = true;
    TestApp::with_config(config)
}

#[tokio::test]
async fn test_login_is_public_at_the_edge() {
    let app = edge_app();
    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "nobody@example.com", "password": "whatever" })),
            None,
        )
        .await;
    // Reached the handler rather than being stopped for a missing token.
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error(), "Invalid credentials");
}

#[tokio::test]
async fn test_users_path_is_admin_only_at_the_edge() {
    let app = edge_app();
    let (user, token) = app.identity("edge-user@example.com", Role::User).await;

    let list = app.request("GET", "/api/users", None, Some(&token)).await;
    assert_eq!(list.status, StatusCode::FORBIDDEN);

    // The API alone would let an owner read their own record.
    let own = app
        .request("GET", &format!("/api/users/{}", user.id), None, Some(&token))
        .await;
    assert_eq!(own.status, StatusCode::FORBIDDEN);
    assert_eq!(own.error(), "Access denied. Required role: Admin");
    assert!(
        own.headers.get("x-ratelimit-limit").is_none(),
        "rejected before any route pipeline ran"
    );
}

#[tokio::test]
async fn test_delete_task_requires_admin_at_the_edge() {
    let app = edge_app();
    let (_, user_token) = app.identity("deleter@example.com", Role::User).await;
    let (_, admin_token) = app.identity("boss@example.com", Role::Admin).await;

    let denied = app
        .request("DELETE", "/api/tasks/42", None, Some(&user_token))
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    // Admin passes the edge; the API then rejects the malformed id.
    let passed = app
        .request("DELETE", "/api/tasks/42", None, Some(&admin_token))
        .await;
    assert_eq!(passed.status, StatusCode::BAD_REQUEST);

    let read = app
        .request("GET", "/api/tasks", None, Some(&user_token))
        .await;
    assert_eq!(read.status, StatusCode::OK);
}

#[tokio::test]
async fn test_edge_rejects_missing_and_expired_tokens() {
    let app = edge_app();
    let missing = app.request("GET", "/api/tasks", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.error(), "No token provided");

    let (identity, _) = app.identity("old@example.com", Role::User).await;
    let expired = TokenService::with_clock(
        &app.state.config.auth,
        Arc::new(ManualClock::new(Utc::now() - Duration::hours(1))),
    )
    .issue_access_token(&identity)
    .unwrap();
    let response = app.request("GET", "/api/tasks", None, Some(&expired)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error(), "Token has expired");
}

#[tokio::test]
async fn test_spoofed_role_header_does_not_elevate() {
    let app = edge_app();
    let (_, token) = app.identity("spoof@example.com", Role::User).await;
    let response = app
        .request_with(
            "GET",
            "/api/users",
            None,
            Some(&token),
            &[("x-user-role", "Admin")],
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}
