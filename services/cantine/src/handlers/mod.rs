pub mod dish;
pub mod menu;
pub mod order;
pub mod review;
pub mod stats;
pub mod token;
pub mod user;

use cantine_auth_types::identity::Identity;
use cantine_domain::user::Role;

use crate::error::CantineError;

/// Decode the caller's role and require it to be one of `allowed`.
pub(crate) fn require_role(identity: &Identity, allowed: &[Role]) -> Result<Role, CantineError> {
    let role = Role::from_u8(identity.role).ok_or(CantineError::Forbidden)?;
    if allowed.contains(&role) {
        Ok(role)
    } else {
        Err(CantineError::Forbidden)
    }
}
