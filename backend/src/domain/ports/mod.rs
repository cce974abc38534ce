//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters;
//! driving ports (`*Command`, `*Query`, [`LoginService`]) are implemented by
//! domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod expense_command;
mod expense_query;
mod expense_repository;
mod invitation_command;
mod invitation_query;
mod invitation_repository;
mod login_service;
mod notification_command;
mod notification_query;
mod notification_repository;
mod notifier;
mod organization_repository;
mod project_command;
mod project_query;
mod project_repository;
mod stats_query;
mod stats_repository;
mod user_repository;
mod vendor_bill_command;
mod vendor_bill_query;
mod vendor_bill_repository;

#[cfg(test)]
pub use expense_command::MockExpenseCommand;
pub use expense_command::{ExpenseCommand, FixtureExpenseCommand, transition_conflict};
#[cfg(test)]
pub use expense_query::MockExpenseQuery;
pub use expense_query::{ExpenseQuery, FixtureExpenseQuery};
#[cfg(test)]
pub use expense_repository::MockExpenseRepository;
pub use expense_repository::{ExpenseRepository, ExpenseRepositoryError, NewExpense};
#[cfg(test)]
pub use invitation_command::MockInvitationCommand;
pub use invitation_command::{FixtureInvitationCommand, InvitationCommand, acceptance_conflict};
#[cfg(test)]
pub use invitation_query::MockInvitationQuery;
pub use invitation_query::{FixtureInvitationQuery, InvitationQuery};
#[cfg(test)]
pub use invitation_repository::MockInvitationRepository;
pub use invitation_repository::{InvitationRepository, InvitationRepositoryError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{
    FIXTURE_LOGIN_EMAIL, FIXTURE_LOGIN_PASSWORD, FIXTURE_LOGIN_USER_ID, FixtureLoginService,
    LoginService,
};
#[cfg(test)]
pub use notification_command::MockNotificationCommand;
pub use notification_command::{FixtureNotificationCommand, NotificationCommand};
#[cfg(test)]
pub use notification_query::MockNotificationQuery;
pub use notification_query::{FixtureNotificationQuery, NotificationQuery};
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::{NotificationRepository, NotificationRepositoryError};
#[cfg(test)]
pub use notifier::MockNotifier;
pub use notifier::{NoOpNotifier, Notifier};
#[cfg(test)]
pub use organization_repository::MockOrganizationRepository;
pub use organization_repository::{
    FixtureOrganizationRepository, OrganizationRepository, OrganizationRepositoryError,
};
#[cfg(test)]
pub use project_command::MockProjectCommand;
pub use project_command::{FixtureProjectCommand, ProjectCommand};
#[cfg(test)]
pub use project_query::MockProjectQuery;
pub use project_query::{FixtureProjectQuery, ProjectQuery};
#[cfg(test)]
pub use project_repository::MockProjectRepository;
pub use project_repository::{ProjectRepository, ProjectRepositoryError};
#[cfg(test)]
pub use stats_query::MockStatsQuery;
pub use stats_query::{FixtureStatsQuery, StatsQuery};
#[cfg(test)]
pub use stats_repository::MockStatsRepository;
pub use stats_repository::{FixtureStatsRepository, StatsRepository, StatsRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserCredentials, UserPersistenceError, UserRepository};
#[cfg(test)]
pub use vendor_bill_command::MockVendorBillCommand;
pub use vendor_bill_command::{
    FixtureVendorBillCommand, VendorBillCommand, bill_payment_conflict,
};
#[cfg(test)]
pub use vendor_bill_query::MockVendorBillQuery;
pub use vendor_bill_query::{FixtureVendorBillQuery, VendorBillQuery};
#[cfg(test)]
pub use vendor_bill_repository::MockVendorBillRepository;
pub use vendor_bill_repository::{VendorBillRepository, VendorBillRepositoryError};
