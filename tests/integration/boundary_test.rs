//! Integration tests for the outermost error boundary.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use taskgate_core::config::{AppConfig, Posture};
use taskgate_core::error::AppError;
use taskgate_core::result::AppResult;
use taskgate_core::traits::IdentityStore;
use taskgate_core::types::{Identity, NewIdentity, StoredCredential};

use crate::helpers::{PASSWORD, TestApp};

/// Store whose every call fails.
struct FailingStore;

#[async_trait]
impl IdentityStore for FailingStore {
    async fn find_by_id(&self, _id: Uuid) -> AppResult<Option<Identity>> {
        Err(AppError::internal("identity backend unreachable"))
    }
    async fn find_by_email(&self, _email: &str) -> AppResult<Option<StoredCredential>> {
        Err(AppError::internal("identity backend unreachable"))
    }
    async fn create(&self, _fields: NewIdentity) -> AppResult<Identity> {
        Err(AppError::internal("identity backend unreachable"))
    }
    async fn list(&self) -> AppResult<Vec<Identity>> {
        Err(AppError::internal("identity backend unreachable"))
    }
}

fn app(posture: Posture) -> TestApp {
    let mut config = AppConfig::default();
    config.server.posture = posture;
    TestApp::with_store(config, Arc::new(FailingStore))
}

fn login_body() -> serde_json::Value {
    json!({ "email": "any@example.com", "password": PASSWORD })
}

#[tokio::test]
async fn test_internal_detail_shown_in_development() {
    let app = app(Posture::Development);
    let response = app
        .request("POST", "/api/auth/login", Some(login_body()), None)
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.error(), "Internal server error");
    assert_eq!(response.body["code"], 500);
    assert_eq!(response.body["detail"], "identity backend unreachable");
}

#[tokio::test]
async fn test_internal_detail_hidden_in_production() {
    let app = app(Posture::Production);
    let response = app
        .request("POST", "/api/auth/login", Some(login_body()), None)
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.error(), "Internal server error");
    assert!(response.body.get("detail").is_none());
}

#[tokio::test]
async fn test_gate_denies_when_store_fails() {
    let app = app(Posture::Development);
    let identity = Identity {
        id: Uuid::new_v4(),
        name: "Someone".into(),
        email: "someone@example.com".into(),
        role: taskgate_core::types::Role::User,
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    };
    let token = app.state.tokens.issue_access_token(&identity).unwrap();

    let response = app.request("GET", "/api/tasks", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error(), "Authentication failed");
}
