//! Response DTOs.

use serde::{Deserialize, Serialize};

use taskgate_auth::TokenPair;
use taskgate_core::types::Identity;
use taskgate_governor::GovernorStats;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Register, login, and refresh response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The identity the tokens were issued for.
    pub user: Identity,
    /// Fresh access + refresh pair.
    pub tokens: TokenPair,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Whether a valid bearer token accompanied the request.
    pub authenticated: bool,
}

/// Governor snapshot for the admin endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct RateLimitStatsResponse {
    pub governors: Vec<GovernorStats>,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}
