//! # taskgate-api
//!
//! HTTP API layer for TaskGate built on Axum.
//!
//! Provides the request pipeline (logger, rate governor, authentication
//! gate), the edge gate adapter, the error boundary, extractors, DTOs,
//! handlers, and in-memory stores standing in for persistence.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod pipeline;
pub mod router;
pub mod state;
pub mod store;

pub use app::{build_app, run_server};
pub use error::{ApiError, ApiResult};
pub use state::AppState;
