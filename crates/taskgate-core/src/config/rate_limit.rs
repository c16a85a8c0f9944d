//! Rate governor configuration.

use serde::{Deserialize, Serialize};

/// Process-wide fixed-window rate limit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests admitted per key per window.
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
    /// Window length in seconds.
    #[serde(default = "default_window")]
    pub window_seconds: u64,
    /// How often expired entries are swept, in seconds.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
    /// Exempt loopback clients. Only honoured in the development posture.
    #[serde(default)]
    pub bypass_loopback: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_seconds: default_window(),
            sweep_interval_seconds: default_sweep_interval(),
            bypass_loopback: false,
        }
    }
}

/// Tighter limit applied to credential submission routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRateLimitConfig {
    /// Attempts admitted per key per window.
    #[serde(default = "default_login_max_requests")]
    pub max_requests: u32,
    /// Window length in seconds.
    #[serde(default = "default_window")]
    pub window_seconds: u64,
}

impl Default for LoginRateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_login_max_requests(),
            window_seconds: default_window(),
        }
    }
}

fn default_max_requests() -> u32 {
    100
}

fn default_login_max_requests() -> u32 {
    5
}

fn default_window() -> u64 {
    900
}

fn default_sweep_interval() -> u64 {
    300
}
