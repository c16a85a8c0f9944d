//! Integration tests for the rate governor stages.

use axum::http::StatusCode;
use axum::http::header::RETRY_AFTER;
use chrono::Duration;
use serde_json::json;

use taskgate_core::config::AppConfig;

use crate::helpers::TestApp;

fn limited(max_requests: u32) -> AppConfig {
    let mut config = AppConfig::default();
    config.rate_limit.max_requests = max_requests;
    config.rate_limit.window_seconds = 60;
    config
}

#[tokio::test]
async fn test_headers_then_429_then_window_reset() {
    let app = TestApp::with_config(limited(3));

    for remaining in ["2", "1", "0"] {
        let response = app.request("GET", "/api/health", None, None).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.headers["x-ratelimit-limit"], "3");
        assert_eq!(response.headers["x-ratelimit-remaining"], remaining);
        assert!(response.headers.contains_key("x-ratelimit-reset"));
    }

    let denied = app.request("GET", "/api/health", None, None).await;
    assert_eq!(denied.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(denied.body["success"], false);
    assert_eq!(denied.body["code"], 429);
    assert_eq!(denied.body["details"]["limit"], 3);
    assert_eq!(denied.body["details"]["remaining"], 0);
    assert_eq!(denied.body["details"]["retryAfter"], 60);
    assert!(denied.body["details"]["resetTime"].is_string());
    assert_eq!(denied.headers[RETRY_AFTER], "60");
    assert_eq!(denied.headers["x-ratelimit-remaining"], "0");

    app.clock.advance(Duration::seconds(60));
    let after = app.request("GET", "/api/health", None, None).await;
    assert_eq!(after.status, StatusCode::OK);
    assert_eq!(after.headers["x-ratelimit-remaining"], "2");
}

#[tokio::test]
async fn test_rate_limit_runs_before_auth() {
    let app = TestApp::with_config(limited(1));
    let first = app.request("GET", "/api/tasks", None, None).await;
    assert_eq!(first.status, StatusCode::UNAUTHORIZED);
    assert_eq!(first.headers["x-ratelimit-remaining"], "0");

    let second = app.request("GET", "/api/tasks", None, None).await;
    assert_eq!(second.status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_clients_are_keyed_independently() {
    let app = TestApp::with_config(limited(1));
    let a = [("x-forwarded-for", "198.51.100.1, 10.0.0.1")];
    let b = [("x-real-ip", "198.51.100.2")];

    let ok_a = app.request_with("GET", "/api/health", None, None, &a).await;
    let ok_b = app.request_with("GET", "/api/health", None, None, &b).await;
    assert_eq!(ok_a.status, StatusCode::OK);
    assert_eq!(ok_b.status, StatusCode::OK);

    let again_a = app.request_with("GET", "/api/health", None, None, &a).await;
    assert_eq!(again_a.status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_login_governor_is_tighter_than_default() {
    let mut config = AppConfig::default();
    config.login_rate_limit.max_requests = 2;
    let app = TestApp::with_config(config);

    let attempt = json!({ "email": "nobody@example.com", "password": "guess" });
    for _ in 0..2 {
        let response = app
            .request("POST", "/api/auth/login", Some(attempt.clone()), None)
            .await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    }

    let blocked = app
        .request("POST", "/api/auth/login", Some(attempt), None)
        .await;
    assert_eq!(blocked.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(blocked.body["details"]["limit"], 2);

    // The default governor still has headroom for other routes.
    let health = app.request("GET", "/api/health", None, None).await;
    assert_eq!(health.status, StatusCode::OK);
}

#[tokio::test]
async fn test_loopback_bypass_only_in_development() {
    let mut config = limited(1);
    config.rate_limit.bypass_loopback = true;
    let app = TestApp::with_config(config.clone());
    let loopback = [("x-forwarded-for", "127.0.0.1")];
    for _ in 0..3 {
        let response = app
            .request_from("127.0.0.1:50000", "GET", "/api/health", &loopback)
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    config.server.posture = taskgate_core::config::Posture::Production;
    let app = TestApp::with_config(config);
    app.request_from("127.0.0.1:50000", "GET", "/api/health", &loopback)
        .await;
    let denied = app
        .request_from("127.0.0.1:50000", "GET", "/api/health", &loopback)
        .await;
    assert_eq!(denied.status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_forwarded_loopback_from_remote_peer_is_governed() {
    let mut config = limited(1);
    config.rate_limit.bypass_loopback = true;
    let app = TestApp::with_config(config);
    let spoofed = [("x-forwarded-for", "127.0.0.1")];

    let first = app
        .request_from("203.0.113.9:41000", "GET", "/api/health", &spoofed)
        .await;
    assert_eq!(first.status, StatusCode::OK);
    let second = app
        .request_from("203.0.113.9:41000", "GET", "/api/health", &spoofed)
        .await;
    assert_eq!(second.status, StatusCode::TOO_MANY_REQUESTS);

    // No socket peer at all is never exempt either.
    let anonymous = app
        .request_with("GET", "/api/health", None, None, &spoofed)
        .await;
    assert_eq!(anonymous.status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_admit_exactly_limit() {
    const N: u32 = 20;
    let app = TestApp::with_config(limited(N));

    let requests = (0..N * 2).map(|_| app.request("GET", "/api/health", None, None));
    let responses = futures::future::join_all(requests).await;

    let admitted = responses
        .iter()
        .filter(|r| r.status == StatusCode::OK)
        .count();
    let limited = responses
        .iter()
        .filter(|r| r.status == StatusCode::TOO_MANY_REQUESTS)
        .count();
    assert_eq!(admitted, N as usize);
    assert_eq!(limited, N as usize);
}
