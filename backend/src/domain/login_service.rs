//! Password login backed by the user repository.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::ports::{LoginService, UserPersistenceError, UserRepository};
use crate::domain::{Error, LoginCredentials, UserId};

/// [`LoginService`] that checks credentials against stored digests.
///
/// Unknown e-mails and wrong passwords produce the same error so callers
/// cannot probe which accounts exist.
#[derive(Clone)]
pub struct PasswordLoginService<U> {
    users: Arc<U>,
}

impl<U> PasswordLoginService<U> {
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid credentials")
}

#[async_trait]
impl<U> LoginService for PasswordLoginService<U>
where
    U: UserRepository,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let stored = self
            .users
            .find_credentials(credentials.email())
            .await
            .map_err(|error| match error {
                UserPersistenceError::Connection { message } => {
                    Error::service_unavailable(format!("user repository unavailable: {message}"))
                }
                UserPersistenceError::Query { message } => {
                    Error::internal(format!("user repository error: {message}"))
                }
            })?;
        let Some(stored) = stored else {
            debug!("login for unknown e-mail");
            return Err(invalid_credentials());
        };
        let user_id = stored.user.id().clone();
        match stored.digest.verify(credentials.password()) {
            Ok(true) => Ok(user_id),
            Ok(false) => {
                debug!(%user_id, "login with wrong password");
                Err(invalid_credentials())
            }
            Err(err) => {
                warn!(%user_id, error = %err, "stored password digest unusable");
                Err(Error::internal("stored credentials could not be checked"))
            }
        }
    }
}
