//! Core type definitions used across the TaskGate workspace.

pub mod identity;
pub mod role;

pub use identity::{Identity, NewIdentity, StoredCredential};
pub use role::Role;
