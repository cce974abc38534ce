//! Driving port for organization and user statistics.

use async_trait::async_trait;

use crate::domain::{Caller, Error, OrganizationStats, UserId, UserStats};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsQuery: Send + Sync {
    async fn organization_stats(&self, caller: &Caller) -> Result<OrganizationStats, Error>;

    /// Stats for `user_id` within the caller's organization. Reading someone
    /// else's stats requires the organization stats permission.
    async fn user_stats(&self, caller: &Caller, user_id: &UserId) -> Result<UserStats, Error>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureStatsQuery;

#[async_trait]
impl StatsQuery for FixtureStatsQuery {
    async fn organization_stats(&self, caller: &Caller) -> Result<OrganizationStats, Error> {
        Ok(OrganizationStats::zeroed(caller.organization_id))
    }

    async fn user_stats(&self, caller: &Caller, user_id: &UserId) -> Result<UserStats, Error> {
        Ok(UserStats::zeroed(user_id.clone(), caller.organization_id))
    }
}
