//! Role-gated access checks shared by the domain services.
//!
//! A caller's role is always read from their membership row in the target
//! organization; nothing supplied by the client is trusted as a role.

use tracing::debug;

use super::ports::{OrganizationRepository, OrganizationRepositoryError};
use super::{Action, Error, OrganizationId, Role, UserId};

/// Authenticated user acting within one organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: UserId,
    pub organization_id: OrganizationId,
}

impl Caller {
    pub fn new(user_id: UserId, organization_id: OrganizationId) -> Self {
        Self {
            user_id,
            organization_id,
        }
    }
}

pub(crate) fn map_organization_error(error: OrganizationRepositoryError) -> Error {
    match error {
        OrganizationRepositoryError::Connection { message } => Error::service_unavailable(
            format!("organization repository unavailable: {message}"),
        ),
        OrganizationRepositoryError::Query { message } => {
            Error::internal(format!("organization repository error: {message}"))
        }
    }
}

/// Resolve the caller's role and check it permits `action`.
///
/// Non-members and members whose role is not on the action's allow-list both
/// receive `forbidden`.
pub(crate) async fn authorize<O>(
    organizations: &O,
    caller: &Caller,
    action: Action,
) -> Result<Role, Error>
where
    O: OrganizationRepository + ?Sized,
{
    let role = organizations
        .find_role(&caller.organization_id, &caller.user_id)
        .await
        .map_err(map_organization_error)?
        .ok_or_else(|| {
            Error::forbidden(format!(
                "not a member of organization {}",
                caller.organization_id
            ))
        })?;

    if role.permits(action) {
        Ok(role)
    } else {
        debug!(%role, ?action, "role check failed");
        Err(Error::forbidden(format!(
            "role {role} may not {}",
            action.describe()
        )))
    }
}
