//! PostgreSQL-backed `NotificationRepository` implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{NotificationRepository, NotificationRepositoryError};
use crate::domain::{Notification, NotificationId, NotificationLimit, OrganizationId, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewNotificationRow, NotificationRow};
use super::pool::{DbPool, PoolError};
use super::schema::notifications;

#[derive(Clone)]
pub struct DieselNotificationRepository {
    pool: DbPool,
}

impl DieselNotificationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> NotificationRepositoryError {
    map_basic_pool_error(error, |message| {
        NotificationRepositoryError::connection(message)
    })
}

fn map_diesel_error(error: diesel::result::Error) -> NotificationRepositoryError {
    map_basic_diesel_error(
        error,
        NotificationRepositoryError::query,
        NotificationRepositoryError::connection,
    )
}

fn row_to_notification(row: NotificationRow) -> Notification {
    Notification {
        id: NotificationId::from_uuid(row.id),
        user_id: UserId::from_uuid(row.user_id),
        organization_id: row.organization_id.map(OrganizationId::from_uuid),
        kind: row.kind,
        message: row.message,
        read_at: row.read_at,
        created_at: row.created_at,
    }
}

#[async_trait]
impl NotificationRepository for DieselNotificationRepository {
    async fn insert(&self, notification: &Notification) -> Result<(), NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewNotificationRow {
            id: *notification.id.as_uuid(),
            user_id: *notification.user_id.as_uuid(),
            organization_id: notification.organization_id.map(|id| *id.as_uuid()),
            kind: notification.kind.as_str(),
            message: notification.message.as_str(),
            read_at: notification.read_at,
            created_at: notification.created_at,
        };

        diesel::insert_into(notifications::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn unread_count(&self, user_id: &UserId) -> Result<i64, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        notifications::table
            .filter(notifications::user_id.eq(user_id.as_uuid()))
            .filter(notifications::read_at.is_null())
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn list(
        &self,
        user_id: &UserId,
        unread_only: bool,
        limit: NotificationLimit,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = notifications::table
            .filter(notifications::user_id.eq(*user_id.as_uuid()))
            .into_boxed();
        if unread_only {
            query = query.filter(notifications::read_at.is_null());
        }

        let rows: Vec<NotificationRow> = query
            .order((notifications::created_at.desc(), notifications::id.desc()))
            .limit(i64::from(limit.get()))
            .select(NotificationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_notification).collect())
    }

    async fn mark_read(
        &self,
        user_id: &UserId,
        notification_id: &NotificationId,
        read_at: DateTime<Utc>,
    ) -> Result<bool, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owned = notifications::table
            .filter(notifications::id.eq(*notification_id.as_uuid()))
            .filter(notifications::user_id.eq(*user_id.as_uuid()));

        let updated = diesel::update(owned.clone().filter(notifications::read_at.is_null()))
            .set(notifications::read_at.eq(read_at))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated > 0 {
            return Ok(true);
        }

        // Already read counts as success; a row owned by someone else does not.
        diesel::select(exists(owned))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn mark_all_read(
        &self,
        user_id: &UserId,
        read_at: DateTime<Utc>,
    ) -> Result<u64, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(
            notifications::table
                .filter(notifications::user_id.eq(user_id.as_uuid()))
                .filter(notifications::read_at.is_null()),
        )
        .set(notifications::read_at.eq(read_at))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        u64::try_from(updated)
            .map_err(|err| NotificationRepositoryError::query(format!("row count: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let repo_err = map_pool_error(PoolError::checkout("connection refused"));

        assert!(matches!(
            repo_err,
            NotificationRepositoryError::Connection { .. }
        ));
    }

    #[rstest]
    fn diesel_error_maps_to_query_error() {
        let repo_err = map_diesel_error(diesel::result::Error::NotFound);

        assert!(matches!(
            repo_err,
            NotificationRepositoryError::Query { .. }
        ));
    }

    #[rstest]
    #[case(None, true)]
    #[case(Some(Utc::now()), false)]
    fn row_conversion_tracks_read_state(
        #[case] read_at: Option<DateTime<Utc>>,
        #[case] unread: bool,
    ) {
        let note = row_to_notification(NotificationRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            organization_id: None,
            kind: "expense_approved".to_owned(),
            message: "approved".to_owned(),
            read_at,
            created_at: Utc::now(),
        });

        assert_eq!(note.is_unread(), unread);
    }
}
