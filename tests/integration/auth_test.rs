//! Integration tests for the register, login, and refresh flow.

use axum::http::StatusCode;
use serde_json::json;

use taskgate_auth::TokenKind;

use crate::helpers::{PASSWORD, TestApp};

#[tokio::test]
async fn test_register_login_refresh_end_to_end() {
    let app = TestApp::new();
    let (user_id, _, _) = app.register("flow@example.com").await;

    let login = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "flow@example.com", "password": PASSWORD })),
            None,
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
    assert_eq!(login.body["success"], true);
    assert_eq!(login.body["data"]["user"]["id"], user_id.as_str());
    let refresh_token = login.body["data"]["tokens"]["refreshToken"]
        .as_str()
        .unwrap()
        .to_string();

    let refreshed = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({ "refreshToken": refresh_token })),
            None,
        )
        .await;
    assert_eq!(refreshed.status, StatusCode::OK);
    let access = refreshed.body["data"]["tokens"]["accessToken"]
        .as_str()
        .unwrap();
    let claims = app.state.tokens.verify_access_token(access).unwrap();
    assert_eq!(claims.user_id().to_string(), user_id);
    assert_eq!(claims.kind, TokenKind::Access);

    let me = app.request("GET", "/api/auth/me", None, Some(access)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["data"]["email"], "flow@example.com");
    assert_eq!(me.body["data"]["role"], "User");
}

#[tokio::test]
async fn test_login_rejects_wrong_password_and_unknown_email() {
    let app = TestApp::new();
    app.register("wrong@example.com").await;

    for body in [
        json!({ "email": "wrong@example.com", "password": "not the password" }),
        json!({ "email": "nobody@example.com", "password": PASSWORD }),
    ] {
        let response = app.request("POST", "/api/auth/login", Some(body), None).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.error(), "Invalid credentials");
        assert_eq!(response.body["code"], 401);
    }
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let app = TestApp::new();
    app.register("dup@example.com").await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "name": "Again", "email": "DUP@example.com", "password": PASSWORD })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_validation_envelope() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "name": "", "email": "nope", "password": "short" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.error(), "Validation failed");
    assert!(response.body["details"]["email"].is_array());
}

#[tokio::test]
async fn test_refresh_rejects_access_token() {
    let app = TestApp::new();
    let (_, access, _) = app.register("kind@example.com").await;

    let response = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({ "refreshToken": access })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error(), "Invalid token type: expected refresh token");
}
