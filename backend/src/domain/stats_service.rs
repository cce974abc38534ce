//! Statistics domain service.
//!
//! Aggregates are recomputed on every call. Reading another member's user
//! stats requires the organization stats permission.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::access::authorize;
use crate::domain::ports::{
    OrganizationRepository, StatsQuery, StatsRepository, StatsRepositoryError,
};
use crate::domain::{Action, Caller, Error, OrganizationStats, UserId, UserStats};

#[derive(Clone)]
pub struct StatsService<R, O> {
    stats: Arc<R>,
    organizations: Arc<O>,
}

impl<R, O> StatsService<R, O> {
    pub fn new(stats: Arc<R>, organizations: Arc<O>) -> Self {
        Self {
            stats,
            organizations,
        }
    }
}

fn map_stats_error(error: StatsRepositoryError) -> Error {
    match error {
        StatsRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("stats repository unavailable: {message}"))
        }
        StatsRepositoryError::Query { message } => {
            Error::internal(format!("stats repository error: {message}"))
        }
    }
}

#[async_trait]
impl<R, O> StatsQuery for StatsService<R, O>
where
    R: StatsRepository,
    O: OrganizationRepository,
{
    async fn organization_stats(&self, caller: &Caller) -> Result<OrganizationStats, Error> {
        authorize(
            self.organizations.as_ref(),
            caller,
            Action::ViewOrganizationStats,
        )
        .await?;
        self.stats
            .organization_stats(&caller.organization_id)
            .await
            .map_err(map_stats_error)
    }

    async fn user_stats(&self, caller: &Caller, user_id: &UserId) -> Result<UserStats, Error> {
        let action = if *user_id == caller.user_id {
            Action::ReadRecords
        } else {
            Action::ViewOrganizationStats
        };
        authorize(self.organizations.as_ref(), caller, action).await?;
        self.stats
            .user_stats(&caller.organization_id, user_id)
            .await
            .map_err(map_stats_error)
    }
}
