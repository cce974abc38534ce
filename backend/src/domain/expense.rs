//! Expense records and the approval/payment status workflow.
//!
//! The workflow is a plain enumeration plus a table of legal transitions.
//! Persistence applies a transition with a single conditional `UPDATE` whose
//! `WHERE` clause carries the expected current status, so the database row
//! lock serialises concurrent reviewers.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{
    Action, Currency, ExpenseId, Money, MoneyValidationError, OrganizationId, ProjectId, UserId,
};

/// Lifecycle state of an expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseStatus {
    Submitted,
    Approved,
    Paid,
    Rejected,
}

/// Error returned when parsing an unknown status string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status: {0}")]
pub struct ParseStatusError(pub String);

impl ExpenseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Paid => "paid",
            Self::Rejected => "rejected",
        }
    }

    /// Every status, in workflow order.
    pub const ALL: [Self; 4] = [Self::Submitted, Self::Approved, Self::Paid, Self::Rejected];

    /// Whether the transition table contains an edge from `self` to `next`.
    pub fn can_transition_to(self, next: Self) -> bool {
        ExpenseTransition::ALL
            .iter()
            .any(|edge| edge.from() == self && edge.to() == next)
    }
}

impl fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(Self::Submitted),
            "approved" => Ok(Self::Approved),
            "paid" => Ok(Self::Paid),
            "rejected" => Ok(Self::Rejected),
            other => Err(ParseStatusError(other.to_owned())),
        }
    }
}

/// Legal expense status transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpenseTransition {
    /// `submitted` → `approved`.
    Approve,
    /// `submitted` → `rejected`.
    Reject,
    /// `approved` → `paid`.
    MarkPaid,
}

impl ExpenseTransition {
    pub const ALL: [Self; 3] = [Self::Approve, Self::Reject, Self::MarkPaid];

    /// Status the expense must currently hold.
    pub fn from(self) -> ExpenseStatus {
        match self {
            Self::Approve | Self::Reject => ExpenseStatus::Submitted,
            Self::MarkPaid => ExpenseStatus::Approved,
        }
    }

    /// Status the expense holds afterwards.
    pub fn to(self) -> ExpenseStatus {
        match self {
            Self::Approve => ExpenseStatus::Approved,
            Self::Reject => ExpenseStatus::Rejected,
            Self::MarkPaid => ExpenseStatus::Paid,
        }
    }

    /// Role-gated action guarding the transition.
    pub fn action(self) -> Action {
        match self {
            Self::Approve => Action::ApproveExpense,
            Self::Reject => Action::RejectExpense,
            Self::MarkPaid => Action::PayExpense,
        }
    }

    /// Past participle used in messages ("cannot be approved").
    pub fn verb(self) -> &'static str {
        match self {
            Self::Approve => "approved",
            Self::Reject => "rejected",
            Self::MarkPaid => "paid",
        }
    }

    /// Notification kind sent to the submitter.
    pub fn notification_kind(self) -> &'static str {
        match self {
            Self::Approve => "expense_approved",
            Self::Reject => "expense_rejected",
            Self::MarkPaid => "expense_paid",
        }
    }
}

/// Maximum description length in characters.
pub const EXPENSE_DESCRIPTION_MAX: usize = 500;
/// Maximum rejection reason length in characters.
pub const REJECTION_REASON_MAX: usize = 500;

/// Validation errors for expense inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExpenseValidationError {
    #[error("description must not be empty")]
    EmptyDescription,
    #[error("description must be at most {max} characters")]
    DescriptionTooLong { max: usize },
    #[error("rejection reason must be at most {max} characters")]
    ReasonTooLong { max: usize },
    #[error(transparent)]
    Money(#[from] MoneyValidationError),
}

/// Validated input for submitting an expense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseDraft {
    description: String,
    money: Money,
    incurred_on: NaiveDate,
    project_id: Option<ProjectId>,
}

impl ExpenseDraft {
    /// Validate raw submission fields.
    pub fn new(
        description: &str,
        amount_cents: i64,
        currency: &str,
        incurred_on: NaiveDate,
        project_id: Option<ProjectId>,
    ) -> Result<Self, ExpenseValidationError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ExpenseValidationError::EmptyDescription);
        }
        if description.chars().count() > EXPENSE_DESCRIPTION_MAX {
            return Err(ExpenseValidationError::DescriptionTooLong {
                max: EXPENSE_DESCRIPTION_MAX,
            });
        }
        let money = Money::new(amount_cents, Currency::new(currency)?)?;
        Ok(Self {
            description: description.to_owned(),
            money,
            incurred_on,
            project_id,
        })
    }

    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    pub fn money(&self) -> &Money {
        &self.money
    }

    pub fn incurred_on(&self) -> NaiveDate {
        self.incurred_on
    }

    pub fn project_id(&self) -> Option<ProjectId> {
        self.project_id
    }
}

/// Optional free-text reason recorded on rejection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RejectionReason(Option<String>);

impl RejectionReason {
    /// Trim the reason; blank input is treated as absent.
    pub fn new(reason: Option<&str>) -> Result<Self, ExpenseValidationError> {
        let Some(trimmed) = reason.map(str::trim).filter(|value| !value.is_empty()) else {
            return Ok(Self(None));
        };
        if trimmed.chars().count() > REJECTION_REASON_MAX {
            return Err(ExpenseValidationError::ReasonTooLong {
                max: REJECTION_REASON_MAX,
            });
        }
        Ok(Self(Some(trimmed.to_owned())))
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// Fully-specified status change handed to the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseTransitionRequest {
    pub expense_id: ExpenseId,
    pub organization_id: OrganizationId,
    pub transition: ExpenseTransition,
    pub actor: UserId,
    pub at: DateTime<Utc>,
    pub reason: RejectionReason,
}

/// Expense as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: ExpenseId,
    pub organization_id: OrganizationId,
    pub submitted_by: UserId,
    pub project_id: Option<ProjectId>,
    pub description: String,
    pub amount_cents: i64,
    pub currency: String,
    pub incurred_on: NaiveDate,
    pub status: ExpenseStatus,
    pub approved_by: Option<UserId>,
    pub approved_at: Option<DateTime<Utc>>,
    pub paid_by: Option<UserId>,
    pub paid_at: Option<DateTime<Utc>>,
    pub rejected_by: Option<UserId>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
