//! # taskgate-edge
//!
//! Perimeter authentication for TaskGate.
//!
//! Runs where the primary token library is unavailable, so token
//! verification is done directly over HMAC-SHA256 and the compact
//! serialization. Accept/reject decisions match the primary verifier in
//! `taskgate-auth` for the same secret, token, and clock.
//!
//! ## Modules
//!
//! - `header`: JOSE header shape
//! - `verifier`: access-token verification
//! - `routes`: static path classification table
//! - `gate`: per-request decision and identity header forwarding

pub mod error;
pub mod gate;
mod header;
pub mod routes;
pub mod verifier;

pub use error::EdgeError;
pub use gate::{EdgeDecision, EdgeGate, HEADER_USER_EMAIL, HEADER_USER_ID, HEADER_USER_ROLE};
pub use routes::{RouteClass, RouteTable, default_table};
pub use verifier::{EdgeClaims, EdgeRole, EdgeVerifier};
