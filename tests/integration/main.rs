//! HTTP-level integration tests driving the assembled axum app.

mod auth_test;
mod boundary_test;
mod edge_test;
mod gate_test;
mod helpers;
mod rate_limit_test;
