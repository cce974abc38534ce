//! Driving port for notification reads.

use async_trait::async_trait;

use crate::domain::{Error, Notification, NotificationLimit, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationQuery: Send + Sync {
    /// Number of unread notifications; zero when there are none.
    async fn unread_count(&self, user_id: &UserId) -> Result<i64, Error>;

    async fn list(
        &self,
        user_id: &UserId,
        unread_only: bool,
        limit: NotificationLimit,
    ) -> Result<Vec<Notification>, Error>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotificationQuery;

#[async_trait]
impl NotificationQuery for FixtureNotificationQuery {
    async fn unread_count(&self, _user_id: &UserId) -> Result<i64, Error> {
        Ok(0)
    }

    async fn list(
        &self,
        _user_id: &UserId,
        _unread_only: bool,
        _limit: NotificationLimit,
    ) -> Result<Vec<Notification>, Error> {
        Ok(Vec::new())
    }
}
