//! Invitation domain service.
//!
//! Accepting an invitation checks the e-mail match up front and leaves the
//! status, expiry and membership insert to the repository's transaction.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::access::authorize;
use crate::domain::ports::{
    InvitationCommand, InvitationQuery, InvitationRepository, InvitationRepositoryError,
    OrganizationRepository, UserPersistenceError, UserRepository, acceptance_conflict,
};
use crate::domain::{
    Action, Caller, EmailAddress, Error, Invitation, InvitationAcceptance, InvitationId, Role,
    UserId,
};

/// Invitation service implementing [`InvitationCommand`] and
/// [`InvitationQuery`].
#[derive(Clone)]
pub struct InvitationService<R, O, U> {
    invitations: Arc<R>,
    organizations: Arc<O>,
    users: Arc<U>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<R, O, U> InvitationService<R, O, U> {
    /// Create a service issuing invitations valid for `ttl`.
    pub fn new(
        invitations: Arc<R>,
        organizations: Arc<O>,
        users: Arc<U>,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            invitations,
            organizations,
            users,
            ttl,
            clock,
        }
    }
}

fn map_invitation_error(error: InvitationRepositoryError) -> Error {
    match error {
        InvitationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("invitation repository unavailable: {message}"))
        }
        InvitationRepositoryError::Query { message } => {
            Error::internal(format!("invitation repository error: {message}"))
        }
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

#[async_trait]
impl<R, O, U> InvitationCommand for InvitationService<R, O, U>
where
    R: InvitationRepository,
    O: OrganizationRepository,
    U: UserRepository,
{
    async fn invite(
        &self,
        caller: &Caller,
        email: EmailAddress,
        role: Role,
    ) -> Result<Invitation, Error> {
        let inviter = authorize(self.organizations.as_ref(), caller, Action::InviteMembers).await?;
        if !inviter.may_grant(role) {
            debug!(%inviter, %role, "role grant refused");
            return Err(Error::forbidden(format!(
                "role {inviter} may not invite members as {role}"
            )));
        }
        let invitation = Invitation::issue(
            caller.organization_id,
            email,
            role,
            caller.user_id.clone(),
            self.clock.utc(),
            self.ttl,
        );
        self.invitations
            .insert(&invitation)
            .await
            .map_err(map_invitation_error)?;
        info!(
            invitation_id = %invitation.id,
            organization_id = %caller.organization_id,
            %role,
            "invitation issued"
        );
        Ok(invitation)
    }

    async fn accept(
        &self,
        user_id: &UserId,
        invitation_id: &InvitationId,
    ) -> Result<Invitation, Error> {
        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized("login required"))?;

        let invitation = self
            .invitations
            .find(invitation_id)
            .await
            .map_err(map_invitation_error)?
            .ok_or_else(|| acceptance_conflict(invitation_id))?;
        if invitation.email != *user.email() {
            return Err(Error::forbidden(format!(
                "invitation {invitation_id} is addressed to another e-mail address"
            )));
        }

        let accepted = self
            .invitations
            .accept(&InvitationAcceptance {
                invitation_id: *invitation_id,
                user_id: user_id.clone(),
                email: user.email().clone(),
                at: self.clock.utc(),
            })
            .await
            .map_err(map_invitation_error)?
            .ok_or_else(|| acceptance_conflict(invitation_id))?;
        info!(
            invitation_id = %invitation_id,
            organization_id = %accepted.organization_id,
            user_id = %user_id,
            "invitation accepted"
        );
        Ok(accepted)
    }
}

#[async_trait]
impl<R, O, U> InvitationQuery for InvitationService<R, O, U>
where
    R: InvitationRepository,
    O: OrganizationRepository,
    U: UserRepository,
{
    async fn list_pending(&self, caller: &Caller) -> Result<Vec<Invitation>, Error> {
        authorize(self.organizations.as_ref(), caller, Action::InviteMembers).await?;
        self.invitations
            .list_pending(&caller.organization_id, self.clock.utc())
            .await
            .map_err(map_invitation_error)
    }
}

#[cfg(test)]
#[path = "invitation_service_tests.rs"]
mod tests;
