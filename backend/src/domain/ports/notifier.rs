//! Port used by workflows to notify users in-app.
//!
//! Callers treat delivery as best effort: a failed notification is logged
//! and never fails the operation that triggered it.

use async_trait::async_trait;

use crate::domain::{Error, OrganizationId, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        user_id: &UserId,
        organization_id: Option<OrganizationId>,
        kind: &str,
        message: &str,
    ) -> Result<(), Error>;
}

/// Notifier that drops every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpNotifier;

#[async_trait]
impl Notifier for NoOpNotifier {
    async fn notify(
        &self,
        _user_id: &UserId,
        _organization_id: Option<OrganizationId>,
        _kind: &str,
        _message: &str,
    ) -> Result<(), Error> {
        Ok(())
    }
}
