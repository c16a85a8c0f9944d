//! Role-based access control.

pub mod enforcer;

pub use enforcer::{ADMIN_ONLY, AUTHENTICATED, is_owner_or_admin, require_role};
