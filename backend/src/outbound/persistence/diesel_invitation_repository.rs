//! PostgreSQL-backed `InvitationRepository` implementation.
//!
//! Acceptance flips the invitation to `accepted` and inserts the membership
//! in one transaction. The guarded `UPDATE` matches only a pending,
//! unexpired invitation for the accepting address, so a second accept sees
//! zero rows.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{InvitationRepository, InvitationRepositoryError};
use crate::domain::{
    EmailAddress, Invitation, InvitationAcceptance, InvitationId, InvitationStatus,
    OrganizationId, Role, UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{InvitationRow, NewInvitationRow, NewMembershipRow};
use super::pool::{DbPool, PoolError};
use super::schema::{invitations, memberships};

#[derive(Clone)]
pub struct DieselInvitationRepository {
    pool: DbPool,
}

impl DieselInvitationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> InvitationRepositoryError {
    map_basic_pool_error(error, |message| InvitationRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> InvitationRepositoryError {
    map_basic_diesel_error(
        error,
        InvitationRepositoryError::query,
        InvitationRepositoryError::connection,
    )
}

fn corrupt(field: &str, err: impl std::fmt::Display) -> InvitationRepositoryError {
    InvitationRepositoryError::query(format!("stored invitation {field}: {err}"))
}

fn row_to_invitation(row: InvitationRow) -> Result<Invitation, InvitationRepositoryError> {
    let InvitationRow {
        id,
        organization_id,
        email,
        role,
        invited_by,
        status,
        accepted_by,
        accepted_at,
        expires_at,
        created_at,
    } = row;

    Ok(Invitation {
        id: InvitationId::from_uuid(id),
        organization_id: OrganizationId::from_uuid(organization_id),
        email: EmailAddress::new(&email).map_err(|err| corrupt("email", err))?,
        role: role.parse::<Role>().map_err(|err| corrupt("role", err))?,
        invited_by: UserId::from_uuid(invited_by),
        status: status
            .parse::<InvitationStatus>()
            .map_err(|err| corrupt("status", err))?,
        accepted_by: accepted_by.map(UserId::from_uuid),
        accepted_at,
        expires_at,
        created_at,
    })
}

#[async_trait]
impl InvitationRepository for DieselInvitationRepository {
    async fn insert(&self, invitation: &Invitation) -> Result<(), InvitationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewInvitationRow {
            id: *invitation.id.as_uuid(),
            organization_id: *invitation.organization_id.as_uuid(),
            email: invitation.email.as_ref(),
            role: invitation.role.as_str(),
            invited_by: *invitation.invited_by.as_uuid(),
            status: invitation.status.as_str(),
            expires_at: invitation.expires_at,
            created_at: invitation.created_at,
        };

        diesel::insert_into(invitations::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find(
        &self,
        invitation_id: &InvitationId,
    ) -> Result<Option<Invitation>, InvitationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = invitations::table
            .filter(invitations::id.eq(invitation_id.as_uuid()))
            .select(InvitationRow::as_select())
            .first::<InvitationRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_invitation).transpose()
    }

    async fn list_pending(
        &self,
        organization_id: &OrganizationId,
        now: DateTime<Utc>,
    ) -> Result<Vec<Invitation>, InvitationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<InvitationRow> = invitations::table
            .filter(invitations::organization_id.eq(organization_id.as_uuid()))
            .filter(invitations::status.eq(InvitationStatus::Pending.as_str()))
            .filter(invitations::expires_at.gt(now))
            .order(invitations::created_at.desc())
            .select(InvitationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_invitation).collect()
    }

    async fn accept(
        &self,
        acceptance: &InvitationAcceptance,
    ) -> Result<Option<Invitation>, InvitationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let invitation_id = *acceptance.invitation_id.as_uuid();
        let user_id = *acceptance.user_id.as_uuid();
        let email = acceptance.email.as_ref().to_owned();
        let at = acceptance.at;

        let row = conn
            .transaction(|conn| {
                async move {
                    let accepted: Option<InvitationRow> = diesel::update(
                        invitations::table
                            .filter(invitations::id.eq(invitation_id))
                            .filter(invitations::status.eq(InvitationStatus::Pending.as_str()))
                            .filter(invitations::expires_at.gt(at))
                            .filter(invitations::email.eq(&email)),
                    )
                    .set((
                        invitations::status.eq(InvitationStatus::Accepted.as_str()),
                        invitations::accepted_by.eq(user_id),
                        invitations::accepted_at.eq(at),
                    ))
                    .returning(InvitationRow::as_returning())
                    .get_result(conn)
                    .await
                    .optional()?;

                    let Some(accepted) = accepted else {
                        return Ok(None);
                    };

                    diesel::insert_into(memberships::table)
                        .values(&NewMembershipRow {
                            organization_id: accepted.organization_id,
                            user_id,
                            role: accepted.role.as_str(),
                        })
                        .on_conflict((memberships::organization_id, memberships::user_id))
                        .do_nothing()
                        .execute(conn)
                        .await?;

                    Ok::<_, diesel::result::Error>(Some(accepted))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        row.map(row_to_invitation).transpose()
    }
}
