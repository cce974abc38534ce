//! PostgreSQL-backed `UserRepository` implementation.
//!
//! Addresses are stored lower-cased, matching [`EmailAddress`] normalisation,
//! so lookups are plain equality.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserCredentials, UserPersistenceError, UserRepository};
use crate::domain::{DisplayName, EmailAddress, PasswordDigest, User, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::UserRow;
use super::pool::{DbPool, PoolError};
use super::schema::users;

#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, |message| UserPersistenceError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn row_to_credentials(row: UserRow) -> Result<UserCredentials, UserPersistenceError> {
    let UserRow {
        id,
        email,
        display_name,
        password_digest,
    } = row;
    let email = EmailAddress::new(&email)
        .map_err(|err| UserPersistenceError::query(format!("stored email: {err}")))?;
    let display_name = DisplayName::new(&display_name)
        .map_err(|err| UserPersistenceError::query(format!("stored display name: {err}")))?;
    Ok(UserCredentials {
        user: User::new(UserId::from_uuid(id), email, display_name),
        digest: PasswordDigest::from_stored(password_digest),
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_credentials(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserCredentials>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_credentials).transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|row| row_to_credentials(row).map(|credentials| credentials.user))
            .transpose()
    }
}
