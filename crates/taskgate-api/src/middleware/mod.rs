//! Axum middleware stack.
//!
//! Route-level concerns (logging, rate governance, authentication) are
//! pipeline stages; router-level ones (edge gate, error boundary, CORS)
//! are plain tower layers.

pub mod auth;
pub mod boundary;
pub mod cors;
pub mod edge;
pub mod logging;
pub mod rate_limit;

pub use auth::{AuthStage, OptionalAuthStage};
pub use boundary::error_boundary;
pub use cors::build_cors_layer;
pub use edge::edge_gate;
pub use logging::RequestLogger;
pub use rate_limit::RateLimitStage;
