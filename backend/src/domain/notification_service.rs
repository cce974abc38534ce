//! Notification domain service.
//!
//! Serves the user's own inbox and doubles as the [`Notifier`] the expense
//! workflow writes through.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{
    NotificationCommand, NotificationQuery, NotificationRepository, NotificationRepositoryError,
    Notifier,
};
use crate::domain::{
    Error, Notification, NotificationId, NotificationLimit, OrganizationId, UserId,
};

#[derive(Clone)]
pub struct NotificationService<R> {
    notifications: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> NotificationService<R> {
    pub fn new(notifications: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            notifications,
            clock,
        }
    }
}

fn map_notification_error(error: NotificationRepositoryError) -> Error {
    match error {
        NotificationRepositoryError::Connection { message } => Error::service_unavailable(
            format!("notification repository unavailable: {message}"),
        ),
        NotificationRepositoryError::Query { message } => {
            Error::internal(format!("notification repository error: {message}"))
        }
    }
}

#[async_trait]
impl<R> NotificationCommand for NotificationService<R>
where
    R: NotificationRepository,
{
    async fn mark_read(
        &self,
        user_id: &UserId,
        notification_id: &NotificationId,
    ) -> Result<(), Error> {
        let found = self
            .notifications
            .mark_read(user_id, notification_id, self.clock.utc())
            .await
            .map_err(map_notification_error)?;
        if found {
            Ok(())
        } else {
            Err(Error::not_found(format!(
                "notification {notification_id} not found"
            )))
        }
    }

    async fn mark_all_read(&self, user_id: &UserId) -> Result<u64, Error> {
        let updated = self
            .notifications
            .mark_all_read(user_id, self.clock.utc())
            .await
            .map_err(map_notification_error)?;
        debug!(%user_id, updated, "notifications marked read");
        Ok(updated)
    }
}

#[async_trait]
impl<R> NotificationQuery for NotificationService<R>
where
    R: NotificationRepository,
{
    async fn unread_count(&self, user_id: &UserId) -> Result<i64, Error> {
        self.notifications
            .unread_count(user_id)
            .await
            .map_err(map_notification_error)
    }

    async fn list(
        &self,
        user_id: &UserId,
        unread_only: bool,
        limit: NotificationLimit,
    ) -> Result<Vec<Notification>, Error> {
        self.notifications
            .list(user_id, unread_only, limit)
            .await
            .map_err(map_notification_error)
    }
}

#[async_trait]
impl<R> Notifier for NotificationService<R>
where
    R: NotificationRepository,
{
    async fn notify(
        &self,
        user_id: &UserId,
        organization_id: Option<OrganizationId>,
        kind: &str,
        message: &str,
    ) -> Result<(), Error> {
        let notification = Notification::unread(
            user_id.clone(),
            organization_id,
            kind,
            message,
            self.clock.utc(),
        );
        self.notifications
            .insert(&notification)
            .await
            .map_err(map_notification_error)
    }
}
