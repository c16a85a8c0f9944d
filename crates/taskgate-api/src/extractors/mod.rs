//! Custom Axum extractors.

pub mod auth;
pub mod json;
pub mod path;

pub use auth::{CurrentUser, OptionalUser};
pub use json::ValidJson;
pub use path::parse_uuid;
