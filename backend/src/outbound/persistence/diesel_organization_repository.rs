//! PostgreSQL-backed `OrganizationRepository` used by role checks.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{OrganizationRepository, OrganizationRepositoryError};
use crate::domain::{OrganizationId, ProjectId, Role, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::pool::{DbPool, PoolError};
use super::schema::{memberships, projects};

#[derive(Clone)]
pub struct DieselOrganizationRepository {
    pool: DbPool,
}

impl DieselOrganizationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> OrganizationRepositoryError {
    map_basic_pool_error(error, |message| {
        OrganizationRepositoryError::connection(message)
    })
}

fn map_diesel_error(error: diesel::result::Error) -> OrganizationRepositoryError {
    map_basic_diesel_error(
        error,
        OrganizationRepositoryError::query,
        OrganizationRepositoryError::connection,
    )
}

fn parse_role(raw: &str) -> Result<Role, OrganizationRepositoryError> {
    raw.parse()
        .map_err(|err| OrganizationRepositoryError::query(format!("stored membership {err}")))
}

#[async_trait]
impl OrganizationRepository for DieselOrganizationRepository {
    async fn find_role(
        &self,
        organization_id: &OrganizationId,
        user_id: &UserId,
    ) -> Result<Option<Role>, OrganizationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let role: Option<String> = memberships::table
            .filter(memberships::organization_id.eq(organization_id.as_uuid()))
            .filter(memberships::user_id.eq(user_id.as_uuid()))
            .select(memberships::role)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        role.as_deref().map(parse_role).transpose()
    }

    async fn owns_project(
        &self,
        organization_id: &OrganizationId,
        project_id: ProjectId,
    ) -> Result<bool, OrganizationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::select(exists(
            projects::table
                .filter(projects::id.eq(project_id.get()))
                .filter(projects::organization_id.eq(organization_id.as_uuid())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let repo_err = map_pool_error(PoolError::checkout("connection refused"));

        assert!(matches!(
            repo_err,
            OrganizationRepositoryError::Connection { .. }
        ));
        assert!(repo_err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn diesel_error_maps_to_query_error() {
        let repo_err = map_diesel_error(diesel::result::Error::NotFound);

        assert!(matches!(repo_err, OrganizationRepositoryError::Query { .. }));
    }

    #[rstest]
    #[case("project_manager", Some(Role::ProjectManager))]
    #[case("owner", None)]
    fn stored_roles_are_parsed(#[case] raw: &str, #[case] expected: Option<Role>) {
        assert_eq!(parse_role(raw).ok(), expected);
    }
}
