//! Rate governor stage.

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::ConnectInfo;
use axum::http::{HeaderMap, HeaderValue, header::RETRY_AFTER};
use axum::response::IntoResponse;
use serde_json::json;
use tracing::warn;

use taskgate_core::config::AppConfig;
use taskgate_core::error::AppError;
use taskgate_governor::{Decision, RateGovernor, UNKNOWN_KEY, client_key, is_loopback};

use crate::error::ApiError;
use crate::pipeline::{Flow, StageContext, Stage};

pub const HEADER_LIMIT: &str = "x-ratelimit-limit";
pub const HEADER_REMAINING: &str = "x-ratelimit-remaining";
pub const HEADER_RESET: &str = "x-ratelimit-reset";

const TOO_MANY_REQUESTS: &str = "Too many requests, please try again later.";

/// Counts each request against a governor and rejects with 429 over the limit.
#[derive(Debug, Clone)]
pub struct RateLimitStage {
    governor: Arc<RateGovernor>,
    exempt_loopback: bool,
}

impl RateLimitStage {
    pub fn new(governor: Arc<RateGovernor>) -> Self {
        Self {
            governor,
            exempt_loopback: false,
        }
    }

    /// Applies the loopback exemption policy: only in the development
    /// posture and only when `rate_limit.bypass_loopback` is set.
    ///
    /// The socket peer must itself be loopback. A loopback client key from
    /// forwarding headers alone never exempts a request, and neither does a
    /// request with no known peer.
    pub fn with_policy(mut self, config: &AppConfig) -> Self {
        self.exempt_loopback =
            config.server.posture.is_development() && config.rate_limit.bypass_loopback;
        self
    }

    fn is_exempt(&self, key: &str, ctx: &StageContext) -> bool {
        if !self.exempt_loopback {
            return false;
        }
        let peer_is_loopback = ctx
            .request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .is_some_and(|ConnectInfo(addr)| addr.ip().is_loopback());
        peer_is_loopback && (key == UNKNOWN_KEY || is_loopback(key))
    }
}

#[async_trait]
impl Stage for RateLimitStage {
    fn name(&self) -> &'static str {
        "rate_limit"
    }

    async fn handle(&self, ctx: &mut StageContext) -> Result<Flow, AppError> {
        let key = client_key(ctx.request.headers());
        if self.is_exempt(&key, ctx) {
            return Ok(Flow::Continue);
        }

        let decision = self.governor.admit(&key);
        write_headers(&mut ctx.response_headers, &decision);
        if decision.allowed {
            return Ok(Flow::Continue);
        }

        let retry_after = decision.retry_after_seconds(self.governor.now());
        warn!(
            governor = self.governor.name(),
            key = %key,
            retry_after_secs = retry_after,
            "Rate limit exceeded"
        );

        let mut response = ApiError(AppError::rate_limited(TOO_MANY_REQUESTS).with_details(json!({
            "limit": decision.limit,
            "remaining": 0,
            "resetTime": decision.reset_time.to_rfc3339(),
            "retryAfter": retry_after,
        })))
        .into_response();
        response
            .headers_mut()
            .insert(RETRY_AFTER, HeaderValue::from(retry_after));
        Ok(Flow::Respond(response))
    }
}

/// `X-RateLimit-Reset` carries the window end as Unix seconds.
fn write_headers(headers: &mut HeaderMap, decision: &Decision) {
    headers.insert(HEADER_LIMIT, HeaderValue::from(decision.limit));
    headers.insert(HEADER_REMAINING, HeaderValue::from(decision.remaining));
    headers.insert(
        HEADER_RESET,
        HeaderValue::from(decision.reset_time.timestamp()),
    );
}
