//! Driving port for invitation reads.

use async_trait::async_trait;

use crate::domain::{Caller, Error, Invitation};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvitationQuery: Send + Sync {
    /// Pending, unexpired invitations of the caller's organization.
    async fn list_pending(&self, caller: &Caller) -> Result<Vec<Invitation>, Error>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureInvitationQuery;

#[async_trait]
impl InvitationQuery for FixtureInvitationQuery {
    async fn list_pending(&self, _caller: &Caller) -> Result<Vec<Invitation>, Error> {
        Ok(Vec::new())
    }
}
