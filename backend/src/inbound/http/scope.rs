//! Resolution of the acting [`Caller`] for organization-scoped routes.
//!
//! The user always comes from the session. The organization comes either from
//! the `organizationId` query parameter or from an `/organizations/{id}` path
//! segment; the legacy `userId` parameter is only checked for consistency.

use serde::Deserialize;

use crate::domain::{Caller, Error, OrganizationId};

use super::session::SessionContext;
use super::validation::{
    FieldName, ORGANIZATION_ID, ensure_session_user, missing_field_error, parse_uuid,
};

/// `?organizationId=...&userId=...` query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationScope {
    pub organization_id: Option<String>,
    pub user_id: Option<String>,
}

impl OrganizationScope {
    /// Resolve the caller, checking the session before any parameter.
    pub(crate) fn caller(&self, session: &SessionContext) -> Result<Caller, Error> {
        let user_id = session.require_user_id()?;
        ensure_session_user(self.user_id.as_deref(), &user_id)?;
        let raw = self
            .organization_id
            .as_deref()
            .ok_or_else(|| missing_field_error(ORGANIZATION_ID))?;
        Ok(Caller::new(user_id, parse_organization_id(raw, ORGANIZATION_ID)?))
    }
}

pub(crate) fn parse_organization_id(raw: &str, field: FieldName) -> Result<OrganizationId, Error> {
    parse_uuid(raw, field).map(OrganizationId::from_uuid)
}

/// Resolve the caller for `/organizations/{id}/...` routes.
pub(crate) fn caller_for_path(
    session: &SessionContext,
    organization_id: &str,
) -> Result<Caller, Error> {
    let user_id = session.require_user_id()?;
    let organization_id = parse_organization_id(organization_id, FieldName::new("id"))?;
    Ok(Caller::new(user_id, organization_id))
}
