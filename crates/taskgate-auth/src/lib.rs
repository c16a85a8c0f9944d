//! # taskgate-auth
//!
//! Authentication and authorization for TaskGate.
//!
//! ## Modules
//!
//! - `jwt`: token issuance, verification, and best-effort unverified decoding
//! - `password`: Argon2id credential hashing
//! - `rbac`: role allow-lists and the ownership predicate
//! - `gate`: the authentication gate composing verification, identity lookup, and roles

pub mod error;
pub mod gate;
pub mod jwt;
pub mod password;
pub mod rbac;

pub use error::AuthError;
pub use gate::{AuthGate, bearer_token};
pub use jwt::{Claims, TokenKind, TokenPair, TokenService, UnverifiedClaims};
pub use password::PasswordHasher;
pub use rbac::{ADMIN_ONLY, AUTHENTICATED, is_owner_or_admin, require_role};
