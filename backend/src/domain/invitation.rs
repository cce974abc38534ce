//! Organization invitations.
//!
//! An invitation binds an e-mail address to a role. Acceptance checks the
//! caller's own address against it, then moves `pending → accepted` and
//! creates the membership in the same transaction.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{EmailAddress, InvitationId, OrganizationId, ParseStatusError, Role, UserId};

/// Invitation lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    Pending,
    Accepted,
}

impl InvitationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
        }
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvitationStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            other => Err(ParseStatusError(other.to_owned())),
        }
    }
}

/// Invitation as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    pub id: InvitationId,
    pub organization_id: OrganizationId,
    pub email: EmailAddress,
    pub role: Role,
    pub invited_by: UserId,
    pub status: InvitationStatus,
    pub accepted_by: Option<UserId>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Invitation {
    /// Build a fresh pending invitation expiring `ttl` after `now`.
    pub fn issue(
        organization_id: OrganizationId,
        email: EmailAddress,
        role: Role,
        invited_by: UserId,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            id: InvitationId::random(),
            organization_id,
            email,
            role,
            invited_by,
            status: InvitationStatus::Pending,
            accepted_by: None,
            accepted_at: None,
            expires_at: now + ttl,
            created_at: now,
        }
    }

    /// Whether the invitation can still be accepted at `now`.
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        self.status == InvitationStatus::Pending && now < self.expires_at
    }
}

/// Parameters for the accept transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationAcceptance {
    pub invitation_id: InvitationId,
    pub user_id: UserId,
    pub email: EmailAddress,
    pub at: DateTime<Utc>,
}
