//! Driving port for login/authentication use-cases.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! authenticate credentials without knowing (or importing) the backing
//! infrastructure. This makes HTTP handler tests deterministic because they
//! can substitute a test double instead of wiring persistence.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, UserId};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user id.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}

pub const FIXTURE_LOGIN_EMAIL: &str = "admin@example.com";
pub const FIXTURE_LOGIN_PASSWORD: &str = "password";
pub const FIXTURE_LOGIN_USER_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

/// In-memory authenticator used when no database is configured.
///
/// `admin@example.com` / `password` authenticates successfully and produces a
/// fixed user id.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        if credentials.email().as_ref() == FIXTURE_LOGIN_EMAIL
            && credentials.password() == FIXTURE_LOGIN_PASSWORD
        {
            UserId::new(FIXTURE_LOGIN_USER_ID)
                .map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))
        } else {
            Err(Error::unauthorized("invalid credentials"))
        }
    }
}
