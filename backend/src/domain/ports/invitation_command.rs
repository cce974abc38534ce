//! Driving port for invitation mutations.

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::domain::{Caller, EmailAddress, Error, Invitation, InvitationId, Role, UserId};

/// Conflict raised when an invitation cannot be accepted.
pub fn acceptance_conflict(invitation_id: &InvitationId) -> Error {
    Error::conflict(format!(
        "invitation {invitation_id} cannot be accepted: it is missing, expired or already accepted"
    ))
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvitationCommand: Send + Sync {
    /// Invite `email` to the caller's organization with `role`.
    async fn invite(
        &self,
        caller: &Caller,
        email: EmailAddress,
        role: Role,
    ) -> Result<Invitation, Error>;

    /// Accept an invitation addressed to the user's own e-mail.
    async fn accept(
        &self,
        user_id: &UserId,
        invitation_id: &InvitationId,
    ) -> Result<Invitation, Error>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureInvitationCommand;

#[async_trait]
impl InvitationCommand for FixtureInvitationCommand {
    async fn invite(
        &self,
        caller: &Caller,
        email: EmailAddress,
        role: Role,
    ) -> Result<Invitation, Error> {
        Ok(Invitation::issue(
            caller.organization_id,
            email,
            role,
            caller.user_id.clone(),
            Utc::now(),
            Duration::days(7),
        ))
    }

    async fn accept(
        &self,
        _user_id: &UserId,
        invitation_id: &InvitationId,
    ) -> Result<Invitation, Error> {
        Err(acceptance_conflict(invitation_id))
    }
}
