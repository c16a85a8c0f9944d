//! Allow-list checks applied after a caller has been authenticated.

use uuid::Uuid;

use taskgate_core::types::{Identity, Role};

use crate::error::AuthError;

/// Only administrators.
pub const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Any authenticated caller.
pub const AUTHENTICATED: &[Role] = &[Role::User, Role::Admin];

/// Checks the identity's role against an allow-list.
///
/// An empty allow-list admits every role.
pub fn require_role(identity: &Identity, allowed: &[Role]) -> Result<(), AuthError> {
    if allowed.is_empty() || allowed.contains(&identity.role) {
        return Ok(());
    }
    Err(AuthError::RoleForbidden {
        required: allowed
            .iter()
            .map(Role::as_str)
            .collect::<Vec<_>>()
            .join(", "),
    })
}

/// Whether the caller owns the resource or is an administrator.
pub fn is_owner_or_admin(identity: &Identity, owner_id: Uuid) -> bool {
    identity.is_admin() || identity.id == owner_id
}
