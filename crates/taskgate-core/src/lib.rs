//! # taskgate-core
//!
//! Core crate for TaskGate. Contains configuration schemas, the caller
//! identity and role types, the collaborator traits the gate consumes
//! (identity store, credential hasher), an injectable clock, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other TaskGate crates.

pub mod clock;
pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::AppError;
pub use result::AppResult;
pub use types::{Identity, NewIdentity, Role, StoredCredential};
