//! Port for invitation persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Invitation, InvitationAcceptance, InvitationId, OrganizationId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by invitation repository adapters.
    pub enum InvitationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "invitation repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "invitation repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvitationRepository: Send + Sync {
    async fn insert(&self, invitation: &Invitation) -> Result<(), InvitationRepositoryError>;

    async fn find(
        &self,
        invitation_id: &InvitationId,
    ) -> Result<Option<Invitation>, InvitationRepositoryError>;

    /// Pending invitations that have not expired at `now`, newest first.
    async fn list_pending(
        &self,
        organization_id: &OrganizationId,
        now: DateTime<Utc>,
    ) -> Result<Vec<Invitation>, InvitationRepositoryError>;

    /// Accept a pending, unexpired invitation addressed to the acceptance
    /// e-mail and create the membership, atomically.
    ///
    /// Returns `Ok(None)` when no invitation matched the precondition.
    async fn accept(
        &self,
        acceptance: &InvitationAcceptance,
    ) -> Result<Option<Invitation>, InvitationRepositoryError>;
}
