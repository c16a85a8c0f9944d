//! Collaborator traits defined in `taskgate-core` and implemented elsewhere.

pub mod credential_hasher;
pub mod identity_store;

pub use credential_hasher::CredentialHasher;
pub use identity_store::IdentityStore;
