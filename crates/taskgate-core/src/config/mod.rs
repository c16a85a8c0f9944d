//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every section carries serde defaults so a missing file
//! still yields a runnable (development) configuration.

pub mod app;
pub mod auth;
pub mod edge;
pub mod logging;
pub mod rate_limit;

use serde::{Deserialize, Serialize};

use self::app::ServerConfig;
use self::auth::AuthConfig;
use self::edge::EdgeConfig;
use self::logging::LoggingConfig;
use self::rate_limit::{LoginRateLimitConfig, RateLimitConfig};

use crate::error::AppError;

pub use self::app::{CorsConfig, Posture};

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay) and
/// `TASKGATE__*` environment variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Token signing and lifetime settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Process-wide rate governor settings.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Route-scoped governor for credential submission.
    #[serde(default)]
    pub login_rate_limit: LoginRateLimitConfig,
    /// Perimeter gate settings.
    #[serde(default)]
    pub edge: EdgeConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `TASKGATE`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("TASKGATE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Reject configurations the gate cannot run safely with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.auth.access_secret.is_empty() || self.auth.refresh_secret.is_empty() {
            return Err(AppError::configuration("Token signing secrets must not be empty"));
        }
        if self.auth.access_secret == self.auth.refresh_secret {
            return Err(AppError::configuration(
                "Access and refresh tokens must be signed with different secrets",
            ));
        }
        if self.server.posture == Posture::Production && self.auth.uses_placeholder_secret() {
            return Err(AppError::configuration(
                "auth.access_secret and auth.refresh_secret must be set in production",
            ));
        }
        if self.rate_limit.max_requests == 0 || self.rate_limit.window_seconds == 0 {
            return Err(AppError::configuration(
                "rate_limit.max_requests and rate_limit.window_seconds must be positive",
            ));
        }
        if self.rate_limit.sweep_interval_seconds == 0 {
            return Err(AppError::configuration(
                "rate_limit.sweep_interval_seconds must be positive",
            ));
        }
        if self.login_rate_limit.max_requests == 0 || self.login_rate_limit.window_seconds == 0 {
            return Err(AppError::configuration(
                "login_rate_limit.max_requests and login_rate_limit.window_seconds must be positive",
            ));
        }
        Ok(())
    }
}
