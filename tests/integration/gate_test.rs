//! Integration tests for the authentication gate on API routes.

use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;

use taskgate_auth::TokenService;
use taskgate_core::clock::ManualClock;
use taskgate_core::types::Role;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_missing_token_is_401() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/tasks", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["code"], 401);
    assert_eq!(response.error(), "No token provided");
}

#[tokio::test]
async fn test_expired_token_is_401_mentioning_expiry() {
    let app = TestApp::new();
    let (identity, _) = app.identity("late@example.com", Role::User).await;

    let past = TokenService::with_clock(
        &app.state.config.auth,
        Arc::new(ManualClock::new(Utc::now() - Duration::hours(2))),
    );
    let expired = past.issue_access_token(&identity).unwrap();

    let response = app.request("GET", "/api/tasks", None, Some(&expired)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.error().contains("expired"), "{}", response.error());
}

#[tokio::test]
async fn test_garbage_token_is_invalid() {
    let app = TestApp::new();
    let response = app
        .request("GET", "/api/tasks", None, Some("definitely.not.valid"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error(), "Invalid token");
}

#[tokio::test]
async fn test_refresh_token_on_protected_route_is_wrong_kind() {
    let app = TestApp::new();
    let (identity, _) = app.identity("kind@example.com", Role::User).await;
    let refresh = app.state.tokens.issue_refresh_token(&identity).unwrap();

    let response = app.request("GET", "/api/tasks", None, Some(&refresh)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error(), "Invalid token type: expected access token");
}

#[tokio::test]
async fn test_deleted_identity_is_user_not_found() {
    let app = TestApp::new();
    let ghost = taskgate_core::types::Identity {
        id: uuid::Uuid::new_v4(),
        name: "Ghost".into(),
        email: "ghost@example.com".into(),
        role: Role::Admin,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    let token = app.state.tokens.issue_access_token(&ghost).unwrap();

    let response = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error(), "User not found");
}

#[tokio::test]
async fn test_user_on_admin_route_is_403_and_admin_passes() {
    let app = TestApp::new();
    let (_, user_token) = app.identity("user@example.com", Role::User).await;
    let (_, admin_token) = app.identity("admin@example.com", Role::Admin).await;

    let denied = app.request("GET", "/api/users", None, Some(&user_token)).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
    assert_eq!(denied.error(), "Access denied. Required role: Admin");

    let allowed = app.request("GET", "/api/users", None, Some(&admin_token)).await;
    assert_eq!(allowed.status, StatusCode::OK);
    assert_eq!(allowed.body["data"].as_array().unwrap().len(), 2);

    let stats = app
        .request("GET", "/api/admin/rate-limits", None, Some(&admin_token))
        .await;
    assert_eq!(stats.status, StatusCode::OK);
    assert_eq!(stats.body["data"]["governors"][0]["name"], "default");
}

#[tokio::test]
async fn test_role_is_read_from_store_not_token() {
    let app = TestApp::new();
    let (user, _) = app.identity("claims@example.com", Role::User).await;

    // Token claims Admin, store says User.
    let mut forged = user.clone();
    forged.role = Role::Admin;
    let token = app.state.tokens.issue_access_token(&forged).unwrap();

    let response = app.request("GET", "/api/users", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_task_ownership() {
    let app = TestApp::new();
    let (_, alice) = app.identity("alice@example.com", Role::User).await;
    let (_, bob) = app.identity("bob@example.com", Role::User).await;
    let (_, admin) = app.identity("root@example.com", Role::Admin).await;

    let created = app
        .request(
            "POST",
            "/api/tasks",
            Some(json!({ "title": "Write tests" })),
            Some(&alice),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let path = format!("/api/tasks/{}", created.body["data"]["id"].as_str().unwrap());

    let foreign = app.request("GET", &path, None, Some(&bob)).await;
    assert_eq!(foreign.status, StatusCode::FORBIDDEN);

    let bob_list = app.request("GET", "/api/tasks", None, Some(&bob)).await;
    assert_eq!(bob_list.body["data"].as_array().unwrap().len(), 0);

    let admin_list = app.request("GET", "/api/tasks", None, Some(&admin)).await;
    assert_eq!(admin_list.body["data"].as_array().unwrap().len(), 1);

    let updated = app
        .request("PUT", &path, Some(json!({ "completed": true })), Some(&alice))
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["data"]["completed"], true);

    let deleted = app.request("DELETE", &path, None, Some(&admin)).await;
    assert_eq!(deleted.status, StatusCode::OK);

    let gone = app.request("GET", &path, None, Some(&alice)).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_is_public_and_reports_recognised_caller() {
    let app = TestApp::new();
    let anonymous = app.request("GET", "/api/health", None, None).await;
    assert_eq!(anonymous.status, StatusCode::OK);
    assert_eq!(anonymous.body["data"]["authenticated"], false);

    let bad = app.request("GET", "/api/health", None, Some("junk")).await;
    assert_eq!(bad.status, StatusCode::OK);
    assert_eq!(bad.body["data"]["authenticated"], false);

    let (_, token) = app.identity("health@example.com", Role::User).await;
    let known = app.request("GET", "/api/health", None, Some(&token)).await;
    assert_eq!(known.body["data"]["authenticated"], true);
}
