//! Identity store trait consumed by the authentication gate and auth handlers.

use async_trait::async_trait;
use uuid::Uuid;

use crate::result::AppResult;
use crate::types::identity::{Identity, NewIdentity, StoredCredential};

/// Lookup and creation of caller identities.
///
/// `Ok(None)` means "no such identity"; `Err` means the store itself
/// failed, which the gate treats as a reason to deny.
#[async_trait]
pub trait IdentityStore: Send + Sync + 'static {
    /// Find an identity by its identifier.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Identity>>;

    /// Find an identity and its credential digest by email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<StoredCredential>>;

    /// Create a new identity. Fails with a conflict if the email is taken.
    async fn create(&self, fields: NewIdentity) -> AppResult<Identity>;

    /// List all identities.
    async fn list(&self) -> AppResult<Vec<Identity>>;
}
