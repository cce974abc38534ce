//! Driving port for notification state changes.

use async_trait::async_trait;

use crate::domain::{Error, NotificationId, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationCommand: Send + Sync {
    /// Mark one of the user's notifications read. Repeating the call is a
    /// no-op; another user's notification is `not_found`.
    async fn mark_read(
        &self,
        user_id: &UserId,
        notification_id: &NotificationId,
    ) -> Result<(), Error>;

    /// Mark all of the user's notifications read, returning how many changed.
    async fn mark_all_read(&self, user_id: &UserId) -> Result<u64, Error>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotificationCommand;

#[async_trait]
impl NotificationCommand for FixtureNotificationCommand {
    async fn mark_read(
        &self,
        _user_id: &UserId,
        notification_id: &NotificationId,
    ) -> Result<(), Error> {
        Err(Error::not_found(format!(
            "notification {notification_id} not found"
        )))
    }

    async fn mark_all_read(&self, _user_id: &UserId) -> Result<u64, Error> {
        Ok(0)
    }
}
