//! Driving port for expense mutations.
//!
//! Inbound adapters call this port to submit expenses and move them through
//! the approval workflow without knowing how roles are resolved or rows are
//! updated.

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    Caller, Error, Expense, ExpenseDraft, ExpenseId, ExpenseStatus, ExpenseTransition, ProjectId,
    RejectionReason,
};

/// Conflict raised when a transition's precondition does not hold.
///
/// Missing rows, rows in another organization and rows in the wrong status
/// all produce this same error.
pub fn transition_conflict(expense_id: ExpenseId, transition: ExpenseTransition) -> Error {
    Error::conflict(format!(
        "expense {expense_id} cannot be {}: it is missing or not {}",
        transition.verb(),
        transition.from()
    ))
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExpenseCommand: Send + Sync {
    /// Submit a new expense on behalf of the caller.
    async fn submit(&self, caller: &Caller, draft: ExpenseDraft) -> Result<Expense, Error>;

    /// `submitted → approved`.
    async fn approve(&self, caller: &Caller, expense_id: ExpenseId) -> Result<Expense, Error>;

    /// `submitted → rejected`, recording an optional reason.
    async fn reject(
        &self,
        caller: &Caller,
        expense_id: ExpenseId,
        reason: RejectionReason,
    ) -> Result<Expense, Error>;

    /// `approved → paid`.
    async fn mark_as_paid(&self, caller: &Caller, expense_id: ExpenseId)
    -> Result<Expense, Error>;

    /// Attach the expense to another project of the same organization, or
    /// detach it with `None`.
    async fn reassign_project(
        &self,
        caller: &Caller,
        expense_id: ExpenseId,
        project_id: Option<ProjectId>,
    ) -> Result<Expense, Error>;
}

/// Fixture command port with no backing store.
///
/// Submissions echo back as expense `1`; every transition fails with the
/// workflow conflict because nothing was ever persisted.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureExpenseCommand;

#[async_trait]
impl ExpenseCommand for FixtureExpenseCommand {
    async fn submit(&self, caller: &Caller, draft: ExpenseDraft) -> Result<Expense, Error> {
        let id = ExpenseId::new(1)
            .map_err(|err| Error::internal(format!("invalid fixture expense id: {err}")))?;
        let now = Utc::now();
        Ok(Expense {
            id,
            organization_id: caller.organization_id,
            submitted_by: caller.user_id.clone(),
            project_id: draft.project_id(),
            description: draft.description().to_owned(),
            amount_cents: draft.money().amount_cents(),
            currency: draft.money().currency().as_ref().to_owned(),
            incurred_on: draft.incurred_on(),
            status: ExpenseStatus::Submitted,
            approved_by: None,
            approved_at: None,
            paid_by: None,
            paid_at: None,
            rejected_by: None,
            rejected_at: None,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        })
    }

    async fn approve(&self, _caller: &Caller, expense_id: ExpenseId) -> Result<Expense, Error> {
        Err(transition_conflict(expense_id, ExpenseTransition::Approve))
    }

    async fn reject(
        &self,
        _caller: &Caller,
        expense_id: ExpenseId,
        _reason: RejectionReason,
    ) -> Result<Expense, Error> {
        Err(transition_conflict(expense_id, ExpenseTransition::Reject))
    }

    async fn mark_as_paid(
        &self,
        _caller: &Caller,
        expense_id: ExpenseId,
    ) -> Result<Expense, Error> {
        Err(transition_conflict(expense_id, ExpenseTransition::MarkPaid))
    }

    async fn reassign_project(
        &self,
        _caller: &Caller,
        expense_id: ExpenseId,
        _project_id: Option<ProjectId>,
    ) -> Result<Expense, Error> {
        Err(Error::not_found(format!("expense {expense_id} not found")))
    }
}
