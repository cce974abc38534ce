//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    ExpenseCommand, ExpenseQuery, FixtureExpenseCommand, FixtureExpenseQuery,
    FixtureInvitationCommand, FixtureInvitationQuery, FixtureLoginService,
    FixtureNotificationCommand, FixtureNotificationQuery, FixtureProjectCommand,
    FixtureProjectQuery, FixtureStatsQuery, FixtureVendorBillCommand, FixtureVendorBillQuery,
    InvitationCommand, InvitationQuery, LoginService, NotificationCommand, NotificationQuery,
    ProjectCommand, ProjectQuery, StatsQuery, VendorBillCommand, VendorBillQuery,
};

/// Dependency bundle for HTTP handlers.
///
/// Fields are public so tests can swap a single port:
///
/// ```
/// use std::sync::Arc;
///
/// use opsdesk::domain::ports::FixtureStatsQuery;
/// use opsdesk::inbound::http::state::HttpState;
///
/// let state = HttpState {
///     stats: Arc::new(FixtureStatsQuery),
///     ..HttpState::fixtures()
/// };
/// let _login = state.login.clone();
/// ```
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub expenses: Arc<dyn ExpenseCommand>,
    pub expenses_query: Arc<dyn ExpenseQuery>,
    pub vendor_bills: Arc<dyn VendorBillCommand>,
    pub vendor_bills_query: Arc<dyn VendorBillQuery>,
    pub invitations: Arc<dyn InvitationCommand>,
    pub invitations_query: Arc<dyn InvitationQuery>,
    pub notifications: Arc<dyn NotificationCommand>,
    pub notifications_query: Arc<dyn NotificationQuery>,
    pub projects: Arc<dyn ProjectCommand>,
    pub projects_query: Arc<dyn ProjectQuery>,
    pub stats: Arc<dyn StatsQuery>,
}

impl HttpState {
    /// State backed entirely by in-memory fixture ports.
    ///
    /// Used when the server starts without a database and as the baseline
    /// for handler tests.
    pub fn fixtures() -> Self {
        Self {
            login: Arc::new(FixtureLoginService),
            expenses: Arc::new(FixtureExpenseCommand),
            expenses_query: Arc::new(FixtureExpenseQuery),
            vendor_bills: Arc::new(FixtureVendorBillCommand),
            vendor_bills_query: Arc::new(FixtureVendorBillQuery),
            invitations: Arc::new(FixtureInvitationCommand),
            invitations_query: Arc::new(FixtureInvitationQuery),
            notifications: Arc::new(FixtureNotificationCommand),
            notifications_query: Arc::new(FixtureNotificationQuery),
            projects: Arc::new(FixtureProjectCommand),
            projects_query: Arc::new(FixtureProjectQuery),
            stats: Arc::new(FixtureStatsQuery),
        }
    }
}
