//! Port for expense persistence.
//!
//! Status changes go through [`ExpenseRepository::apply_transition`], which
//! adapters implement as one conditional `UPDATE` guarded by the expected
//! current status. `Ok(None)` means no row matched: the expense is missing,
//! belongs to another organization, or is not in the transition's source
//! status.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    Expense, ExpenseDraft, ExpenseId, ExpenseStatus, ExpenseTransitionRequest, OrganizationId,
    ProjectId, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by expense repository adapters.
    pub enum ExpenseRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "expense repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "expense repository query failed: {message}",
    }
}

/// Insert parameters for a freshly submitted expense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
    pub organization_id: OrganizationId,
    pub submitted_by: UserId,
    pub draft: ExpenseDraft,
    pub submitted_at: DateTime<Utc>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    /// Insert a new expense in `submitted` status.
    async fn insert(&self, expense: &NewExpense) -> Result<Expense, ExpenseRepositoryError>;

    /// Fetch an expense scoped to its organization.
    async fn find(
        &self,
        organization_id: &OrganizationId,
        expense_id: ExpenseId,
    ) -> Result<Option<Expense>, ExpenseRepositoryError>;

    /// List an organization's expenses, newest first.
    async fn list(
        &self,
        organization_id: &OrganizationId,
        status: Option<ExpenseStatus>,
    ) -> Result<Vec<Expense>, ExpenseRepositoryError>;

    /// Apply a status transition if the precondition still holds.
    async fn apply_transition(
        &self,
        request: &ExpenseTransitionRequest,
    ) -> Result<Option<Expense>, ExpenseRepositoryError>;

    /// Point an expense at another project (or none).
    async fn reassign_project(
        &self,
        organization_id: &OrganizationId,
        expense_id: ExpenseId,
        project_id: Option<ProjectId>,
        at: DateTime<Utc>,
    ) -> Result<Option<Expense>, ExpenseRepositoryError>;
}
