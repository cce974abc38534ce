//! Port for notification persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Notification, NotificationId, NotificationLimit, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification repository adapters.
    pub enum NotificationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "notification repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "notification repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn insert(&self, notification: &Notification) -> Result<(), NotificationRepositoryError>;

    async fn unread_count(&self, user_id: &UserId) -> Result<i64, NotificationRepositoryError>;

    /// Newest first, capped at `limit`.
    async fn list(
        &self,
        user_id: &UserId,
        unread_only: bool,
        limit: NotificationLimit,
    ) -> Result<Vec<Notification>, NotificationRepositoryError>;

    /// Set `read_at` if still unread. Returns `false` when the notification
    /// does not exist for this user.
    async fn mark_read(
        &self,
        user_id: &UserId,
        notification_id: &NotificationId,
        read_at: DateTime<Utc>,
    ) -> Result<bool, NotificationRepositoryError>;

    /// Mark every unread notification read; returns the number updated.
    async fn mark_all_read(
        &self,
        user_id: &UserId,
        read_at: DateTime<Utc>,
    ) -> Result<u64, NotificationRepositoryError>;
}
