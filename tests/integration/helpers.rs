//! Shared test helpers for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use taskgate_api::store::{MemoryIdentityStore, MemoryTaskStore};
use taskgate_api::{AppState, build_app};
use taskgate_auth::PasswordHasher;
use taskgate_core::clock::ManualClock;
use taskgate_core::config::AppConfig;
use taskgate_core::traits::IdentityStore;
use taskgate_core::types::{Identity, NewIdentity, Role};

pub const PASSWORD: &str = "correct horse battery";

/// Test application context
pub struct TestApp {
    /// The assembled router, layers included
    pub router: Router,
    /// State behind the router, for direct store access
    pub state: AppState,
    /// Clock driving the rate governors
    pub clock: Arc<ManualClock>,
}

impl TestApp {
    /// App on default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self::with_store(config, Arc::new(MemoryIdentityStore::new()))
    }

    pub fn with_store(config: AppConfig, identities: Arc<dyn IdentityStore>) -> Self {
        let clock = Arc::new(ManualClock::starting_now());
        let state = AppState::new(
            config,
            identities,
            Arc::new(PasswordHasher::new()),
            Arc::new(MemoryTaskStore::new()),
            clock.clone(),
        );
        Self {
            router: build_app(state.clone()),
            state,
            clock,
        }
    }

    /// Inserts an identity directly and returns it with an access token.
    pub async fn identity(&self, email: &str, role: Role) -> (Identity, String) {
        let identity = self
            .state
            .identities
            .create(NewIdentity {
                name: email.split('@').next().unwrap_or(email).to_string(),
                email: email.to_string(),
                credential_hash: "not-a-real-digest".to_string(),
                role,
            })
            .await
            .expect("Failed to create identity");
        let token = self
            .state
            .tokens
            .issue_access_token(&identity)
            .expect("Failed to issue token");
        (identity, token)
    }

    /// Registers through the API and returns `(user id, access, refresh)`.
    pub async fn register(&self, email: &str) -> (String, String, String) {
        let response = self
            .request(
                "POST",
                "/api/auth/register",
                Some(serde_json::json!({
                    "name": "Test User",
                    "email": email,
                    "password": PASSWORD,
                })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        let data = &response.body["data"];
        (
            data["user"]["id"].as_str().unwrap().to_string(),
            data["tokens"]["accessToken"].as_str().unwrap().to_string(),
            data["tokens"]["refreshToken"].as_str().unwrap().to_string(),
        )
    }

    /// Make a JSON request against the router.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        self.request_with(method, path, body, token, &[]).await
    }

    /// Like [`request`](Self::request) with extra headers.
    pub async fn request_with(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        self.dispatch(method, path, body, token, headers, None)
            .await
    }

    /// Like [`request_with`](Self::request_with), as seen from socket peer `peer`.
    pub async fn request_from(
        &self,
        peer: &str,
        method: &str,
        path: &str,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let peer: SocketAddr = peer.parse().expect("Invalid peer address");
        self.dispatch(method, path, None, None, headers, Some(peer))
            .await
    }

    async fn dispatch(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
        headers: &[(&str, &str)],
        peer: Option<SocketAddr>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }
        for (name, value) in headers {
            req = req.header(*name, *value);
        }

        let mut req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");
        if let Some(peer) = peer {
            req.extensions_mut().insert(ConnectInfo(peer));
        }

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body, `Null` when not JSON
    pub body: Value,
}

impl TestResponse {
    /// The rejection envelope's `error` message.
    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}
