//! Domain primitives, aggregates, services and ports.
//!
//! Purpose: define strongly typed entities used by the API and persistence
//! layers, and the services that enforce role checks and workflow
//! preconditions. Keep types immutable where possible and document
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - Expense / VendorBill: money-bearing records and their status workflow.
//! - Role / Action: the role permission table.
//! - `*Service`: implementations of the driving ports in [`ports`].

pub mod access;
pub mod auth;
pub mod error;
pub mod expense;
mod expense_service;
pub mod invitation;
mod invitation_service;
mod login_service;
pub mod money;
pub mod notification;
mod notification_service;
pub mod organization;
pub mod ports;
pub mod project;
mod project_service;
pub mod record_id;
#[cfg(test)]
mod service_test_support;
pub mod stats;
mod stats_service;
pub mod trace_id;
pub mod user;
pub mod vendor_bill;
mod vendor_bill_service;

pub use self::access::Caller;
pub use self::auth::{
    LoginCredentials, LoginValidationError, PasswordDigest, PasswordDigestError,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::expense::{
    EXPENSE_DESCRIPTION_MAX, Expense, ExpenseDraft, ExpenseStatus, ExpenseTransition,
    ExpenseTransitionRequest, ExpenseValidationError, ParseStatusError, REJECTION_REASON_MAX,
    RejectionReason,
};
pub use self::expense_service::ExpenseService;
pub use self::invitation::{Invitation, InvitationAcceptance, InvitationStatus};
pub use self::invitation_service::InvitationService;
pub use self::login_service::PasswordLoginService;
pub use self::money::{Currency, MAX_AMOUNT_CENTS, Money, MoneyValidationError};
pub use self::notification::{
    NOTIFICATION_LIMIT_DEFAULT, NOTIFICATION_LIMIT_MAX, Notification, NotificationLimit,
    NotificationLimitError,
};
pub use self::notification_service::NotificationService;
pub use self::organization::{Action, OrganizationId, ParseRoleError, Role};
pub use self::project::{
    Project, ProjectDraft, ProjectStatus, ProjectValidationError, Task, TaskDraft, TaskStatus,
};
pub use self::project_service::ProjectService;
pub use self::record_id::{
    ExpenseId, InvitationId, NotificationId, ProjectId, RecordIdError, TaskId, VendorBillId,
};
pub use self::stats::{
    AmountTally, AssignedTaskCounts, OrganizationStats, ProjectCounts, StatusBreakdown,
    TaskCounts, UserStats,
};
pub use self::stats_service::StatsService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{DisplayName, EmailAddress, User, UserId, UserValidationError};
pub use self::vendor_bill::{
    VendorBill, VendorBillDraft, VendorBillStatus, VendorBillValidationError,
};
pub use self::vendor_bill_service::VendorBillService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use opsdesk::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
