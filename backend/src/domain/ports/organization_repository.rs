//! Port for organization-scoped lookups used by role checks.

use async_trait::async_trait;

use crate::domain::{OrganizationId, ProjectId, Role, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by organization repository adapters.
    pub enum OrganizationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "organization repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "organization repository query failed: {message}",
    }
}

/// Read access to memberships and organization-owned projects.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    /// Role `user_id` holds in `organization_id`, or `None` for non-members.
    async fn find_role(
        &self,
        organization_id: &OrganizationId,
        user_id: &UserId,
    ) -> Result<Option<Role>, OrganizationRepositoryError>;

    /// Whether `project_id` exists and belongs to `organization_id`.
    async fn owns_project(
        &self,
        organization_id: &OrganizationId,
        project_id: ProjectId,
    ) -> Result<bool, OrganizationRepositoryError>;
}

/// Fixture repository where nobody belongs to any organization.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureOrganizationRepository;

#[async_trait]
impl OrganizationRepository for FixtureOrganizationRepository {
    async fn find_role(
        &self,
        _organization_id: &OrganizationId,
        _user_id: &UserId,
    ) -> Result<Option<Role>, OrganizationRepositoryError> {
        Ok(None)
    }

    async fn owns_project(
        &self,
        _organization_id: &OrganizationId,
        _project_id: ProjectId,
    ) -> Result<bool, OrganizationRepositoryError> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_has_no_members() {
        let repo = FixtureOrganizationRepository;
        let role = repo
            .find_role(&OrganizationId::random(), &UserId::random())
            .await
            .expect("fixture lookup succeeds");
        assert!(role.is_none());
    }

    #[rstest]
    fn error_messages_carry_context() {
        let err = OrganizationRepositoryError::connection("refused");
        assert_eq!(
            err.to_string(),
            "organization repository connection failed: refused"
        );
    }
}
