//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use taskgate_auth::{AuthGate, PasswordHasher, TokenService};
use taskgate_core::clock::{Clock, SystemClock};
use taskgate_core::config::AppConfig;
use taskgate_core::traits::{CredentialHasher, IdentityStore};
use taskgate_edge::{EdgeGate, EdgeVerifier, default_table};
use taskgate_governor::{GovernorConfig, GovernorRegistry};

use crate::store::{MemoryIdentityStore, MemoryTaskStore};

/// Name of the route-scoped governor on credential submission.
pub const LOGIN_GOVERNOR: &str = "login";

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Auth ─────────────────────────────────────────────────
    /// Token issuance and verification
    pub tokens: Arc<TokenService>,
    /// Primary authentication gate
    pub gate: AuthGate,
    /// Credential hashing collaborator
    pub hasher: Arc<dyn CredentialHasher>,
    /// Perimeter gate, present when `edge.enabled`
    pub edge: Option<Arc<EdgeGate>>,

    // ── Rate governance ──────────────────────────────────────
    /// Default and route-scoped governors
    pub governors: Arc<GovernorRegistry>,

    // ── Stores ───────────────────────────────────────────────
    /// Identity store collaborator
    pub identities: Arc<dyn IdentityStore>,
    /// Task store
    pub tasks: Arc<MemoryTaskStore>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("edge_enabled", &self.edge.is_some())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Wires state from configuration and collaborators.
    ///
    /// `clock` drives the rate governors.
    pub fn new(
        config: AppConfig,
        identities: Arc<dyn IdentityStore>,
        hasher: Arc<dyn CredentialHasher>,
        tasks: Arc<MemoryTaskStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let tokens = Arc::new(TokenService::new(&config.auth));
        let gate = AuthGate::new(tokens.clone(), identities.clone());

        let governors = Arc::new(GovernorRegistry::with_clock(
            GovernorConfig::from(&config.rate_limit),
            clock,
        ));
        governors.scoped(
            LOGIN_GOVERNOR,
            GovernorConfig::from(&config.login_rate_limit),
        );

        let edge = config.edge.enabled.then(|| {
            Arc::new(EdgeGate::new(
                EdgeVerifier::new(
                    config.auth.access_secret.clone(),
                    config.auth.issuer.clone(),
                    config.auth.audience.clone(),
                ),
                default_table(),
            ))
        });

        Self {
            config: Arc::new(config),
            tokens,
            gate,
            hasher,
            edge,
            governors,
            identities,
            tasks,
        }
    }

    /// State backed by the in-memory stores, Argon2, and the system clock.
    pub fn in_memory(config: AppConfig) -> Self {
        Self::new(
            config,
            Arc::new(MemoryIdentityStore::new()),
            Arc::new(PasswordHasher::new()),
            Arc::new(MemoryTaskStore::new()),
            Arc::new(SystemClock),
        )
    }
}
