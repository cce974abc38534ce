//! Port for read-side aggregate queries.

use async_trait::async_trait;

use crate::domain::{OrganizationId, OrganizationStats, UserId, UserStats};

use super::define_port_error;

define_port_error! {
    /// Errors raised by statistics adapters.
    pub enum StatsRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "stats repository connection failed: {message}",
        /// Aggregate query failed during execution.
        Query { message: String } => "stats repository query failed: {message}",
    }
}

/// Aggregates recomputed on every call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsRepository: Send + Sync {
    async fn organization_stats(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<OrganizationStats, StatsRepositoryError>;

    async fn user_stats(
        &self,
        organization_id: &OrganizationId,
        user_id: &UserId,
    ) -> Result<UserStats, StatsRepositoryError>;
}

/// Fixture adapter returning zeroed aggregates.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureStatsRepository;

#[async_trait]
impl StatsRepository for FixtureStatsRepository {
    async fn organization_stats(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<OrganizationStats, StatsRepositoryError> {
        Ok(OrganizationStats::zeroed(*organization_id))
    }

    async fn user_stats(
        &self,
        organization_id: &OrganizationId,
        user_id: &UserId,
    ) -> Result<UserStats, StatsRepositoryError> {
        Ok(UserStats::zeroed(user_id.clone(), *organization_id))
    }
}
