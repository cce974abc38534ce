//! In-app notifications.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{NotificationId, OrganizationId, UserId};

/// Default page size for notification listings.
pub const NOTIFICATION_LIMIT_DEFAULT: u16 = 50;
/// Largest page size a caller may request.
pub const NOTIFICATION_LIMIT_MAX: u16 = 100;

/// Error raised when a listing limit falls outside `1..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("limit must be between 1 and {NOTIFICATION_LIMIT_MAX}, got {0}")]
pub struct NotificationLimitError(pub i64);

/// Bounded page size for notification listings.
///
/// # Examples
/// ```
/// use opsdesk::domain::NotificationLimit;
///
/// assert_eq!(NotificationLimit::new(None).unwrap().get(), 50);
/// assert!(NotificationLimit::new(Some(0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationLimit(u16);

impl NotificationLimit {
    pub fn new(raw: Option<i64>) -> Result<Self, NotificationLimitError> {
        let Some(raw) = raw else {
            return Ok(Self(NOTIFICATION_LIMIT_DEFAULT));
        };
        u16::try_from(raw)
            .ok()
            .filter(|value| (1..=NOTIFICATION_LIMIT_MAX).contains(value))
            .map(Self)
            .ok_or(NotificationLimitError(raw))
    }

    pub fn get(self) -> u16 {
        self.0
    }
}

impl Default for NotificationLimit {
    fn default() -> Self {
        Self(NOTIFICATION_LIMIT_DEFAULT)
    }
}

/// Message delivered to one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub organization_id: Option<OrganizationId>,
    pub kind: String,
    pub message: String,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Build an unread notification created at `now`.
    pub fn unread(
        user_id: UserId,
        organization_id: Option<OrganizationId>,
        kind: impl Into<String>,
        message: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: NotificationId::random(),
            user_id,
            organization_id,
            kind: kind.into(),
            message: message.into(),
            read_at: None,
            created_at: now,
        }
    }

    pub fn is_unread(&self) -> bool {
        self.read_at.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, Some(50))]
    #[case(Some(1), Some(1))]
    #[case(Some(100), Some(100))]
    #[case(Some(0), None)]
    #[case(Some(101), None)]
    #[case(Some(-3), None)]
    fn limit_is_bounded(#[case] raw: Option<i64>, #[case] expected: Option<u16>) {
        assert_eq!(NotificationLimit::new(raw).ok().map(NotificationLimit::get), expected);
    }

    #[rstest]
    fn new_notifications_are_unread() {
        let note = Notification::unread(UserId::random(), None, "expense_paid", "paid", Utc::now());
        assert!(note.is_unread());
    }
}
