//! Request logging: one event per request with method, path, status, latency.
//!
//! The bearer token, when present, is decoded without verification purely
//! to correlate log lines with a user id.

use std::time::Instant;

use axum::extract::{OriginalUri, Request};
use axum::http::{Method, StatusCode, header::AUTHORIZATION};
use tracing::{info, warn};

use taskgate_auth::{UnverifiedClaims, bearer_token};
use taskgate_core::error::AppError;
use taskgate_governor::client_key;

/// Starts request records. Owned by every [`Pipeline`](crate::pipeline::Pipeline).
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestLogger;

impl RequestLogger {
    /// Captures what is known before the request runs.
    pub fn start(&self, request: &Request) -> RequestRecord {
        let user_id = bearer_token(
            request
                .headers()
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok()),
        )
        .and_then(UnverifiedClaims::peek)
        .and_then(|claims| claims.id);

        RequestRecord {
            method: request.method().clone(),
            path: request
                .extensions()
                .get::<OriginalUri>()
                .map_or(request.uri(), |original| &original.0)
                .path()
                .to_string(),
            client: client_key(request.headers()),
            user_id,
            started: Instant::now(),
        }
    }
}

/// An in-flight request.
#[derive(Debug)]
pub struct RequestRecord {
    method: Method,
    path: String,
    client: String,
    user_id: Option<String>,
    started: Instant,
}

impl RequestRecord {
    /// Logs the final status. 5xx at WARN, everything else at INFO.
    pub fn finish(self, status: StatusCode) {
        let latency_ms = self.started.elapsed().as_millis() as u64;
        let user_id = self.user_id.as_deref().unwrap_or("-");
        let status = status.as_u16();

        if status >= 500 {
            warn!(
                method = %self.method,
                path = %self.path,
                status,
                latency_ms,
                client = %self.client,
                user_id,
                "Request failed (5xx)"
            );
        } else if status >= 400 {
            info!(
                method = %self.method,
                path = %self.path,
                status,
                latency_ms,
                client = %self.client,
                user_id,
                "Request completed (4xx)"
            );
        } else {
            info!(
                method = %self.method,
                path = %self.path,
                status,
                latency_ms,
                client = %self.client,
                user_id,
                "Request completed"
            );
        }
    }

    /// Logs an unhandled failure as a 500.
    pub fn fail(self, err: &AppError) {
        warn!(error = %err, "Unhandled failure in request pipeline");
        self.finish(StatusCode::INTERNAL_SERVER_ERROR);
    }
}
