//! Expense domain service implementing the expense driving ports.
//!
//! Every operation resolves the caller's role first, then delegates to the
//! repository. Workflow transitions rely on the repository's conditional
//! update for their precondition; the service only turns "no row matched"
//! into the workflow conflict.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::access::{authorize, map_organization_error};
use crate::domain::ports::{
    ExpenseCommand, ExpenseQuery, ExpenseRepository, ExpenseRepositoryError, NewExpense,
    Notifier, OrganizationRepository, transition_conflict,
};
use crate::domain::{
    Action, Caller, Error, Expense, ExpenseDraft, ExpenseId, ExpenseStatus, ExpenseTransition,
    ExpenseTransitionRequest, ProjectId, RejectionReason,
};

/// Expense service implementing [`ExpenseCommand`] and [`ExpenseQuery`].
#[derive(Clone)]
pub struct ExpenseService<R, O, N> {
    expenses: Arc<R>,
    organizations: Arc<O>,
    notifier: Arc<N>,
    clock: Arc<dyn Clock>,
}

impl<R, O, N> ExpenseService<R, O, N> {
    /// Create a new service.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// # use opsdesk::domain::ExpenseService;
    /// # use opsdesk::domain::ports::{FixtureOrganizationRepository, NoOpNotifier};
    /// # fn build<R: opsdesk::domain::ports::ExpenseRepository>(repo: R) {
    /// let service = ExpenseService::new(
    ///     Arc::new(repo),
    ///     Arc::new(FixtureOrganizationRepository),
    ///     Arc::new(NoOpNotifier),
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = service;
    /// # }
    /// ```
    pub fn new(
        expenses: Arc<R>,
        organizations: Arc<O>,
        notifier: Arc<N>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            expenses,
            organizations,
            notifier,
            clock,
        }
    }
}

fn map_expense_error(error: ExpenseRepositoryError) -> Error {
    match error {
        ExpenseRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("expense repository unavailable: {message}"))
        }
        ExpenseRepositoryError::Query { message } => {
            Error::internal(format!("expense repository error: {message}"))
        }
    }
}

fn expense_not_found(expense_id: ExpenseId) -> Error {
    Error::not_found(format!("expense {expense_id} not found"))
}

fn foreign_project_error(project_id: ProjectId) -> Error {
    Error::invalid_request(format!(
        "project {project_id} does not belong to this organization"
    ))
    .with_details(json!({
        "field": "projectId",
        "value": project_id.get(),
        "code": "unknown_project",
    }))
}

fn notification_message(expense: &Expense, transition: ExpenseTransition) -> String {
    let base = format!(
        "Your expense #{} \"{}\" was {}.",
        expense.id,
        expense.description,
        transition.verb()
    );
    match (transition, expense.rejection_reason.as_deref()) {
        (ExpenseTransition::Reject, Some(reason)) => format!("{base} Reason: {reason}"),
        _ => base,
    }
}

impl<R, O, N> ExpenseService<R, O, N>
where
    R: ExpenseRepository,
    O: OrganizationRepository,
    N: Notifier,
{
    async fn ensure_project_in_organization(
        &self,
        caller: &Caller,
        project_id: Option<ProjectId>,
    ) -> Result<(), Error> {
        let Some(project_id) = project_id else {
            return Ok(());
        };
        let owned = self
            .organizations
            .owns_project(&caller.organization_id, project_id)
            .await
            .map_err(map_organization_error)?;
        if owned {
            Ok(())
        } else {
            Err(foreign_project_error(project_id))
        }
    }

    async fn transition(
        &self,
        caller: &Caller,
        expense_id: ExpenseId,
        transition: ExpenseTransition,
        reason: RejectionReason,
    ) -> Result<Expense, Error> {
        authorize(self.organizations.as_ref(), caller, transition.action()).await?;

        let request = ExpenseTransitionRequest {
            expense_id,
            organization_id: caller.organization_id,
            transition,
            actor: caller.user_id.clone(),
            at: self.clock.utc(),
            reason,
        };
        let expense = self
            .expenses
            .apply_transition(&request)
            .await
            .map_err(map_expense_error)?
            .ok_or_else(|| transition_conflict(expense_id, transition))?;

        info!(
            expense_id = %expense_id,
            organization_id = %caller.organization_id,
            actor = %caller.user_id,
            from = %transition.from(),
            to = %transition.to(),
            "expense status changed"
        );
        self.notify_submitter(&expense, transition).await;
        Ok(expense)
    }

    async fn notify_submitter(&self, expense: &Expense, transition: ExpenseTransition) {
        let message = notification_message(expense, transition);
        if let Err(error) = self
            .notifier
            .notify(
                &expense.submitted_by,
                Some(expense.organization_id),
                transition.notification_kind(),
                &message,
            )
            .await
        {
            warn!(
                expense_id = %expense.id,
                error = %error,
                "failed to notify expense submitter"
            );
        }
    }
}

#[async_trait]
impl<R, O, N> ExpenseCommand for ExpenseService<R, O, N>
where
    R: ExpenseRepository,
    O: OrganizationRepository,
    N: Notifier,
{
    async fn submit(&self, caller: &Caller, draft: ExpenseDraft) -> Result<Expense, Error> {
        authorize(self.organizations.as_ref(), caller, Action::SubmitExpense).await?;
        self.ensure_project_in_organization(caller, draft.project_id())
            .await?;

        let expense = self
            .expenses
            .insert(&NewExpense {
                organization_id: caller.organization_id,
                submitted_by: caller.user_id.clone(),
                draft,
                submitted_at: self.clock.utc(),
            })
            .await
            .map_err(map_expense_error)?;
        info!(
            expense_id = %expense.id,
            organization_id = %caller.organization_id,
            "expense submitted"
        );
        Ok(expense)
    }

    async fn approve(&self, caller: &Caller, expense_id: ExpenseId) -> Result<Expense, Error> {
        self.transition(
            caller,
            expense_id,
            ExpenseTransition::Approve,
            RejectionReason::default(),
        )
        .await
    }

    async fn reject(
        &self,
        caller: &Caller,
        expense_id: ExpenseId,
        reason: RejectionReason,
    ) -> Result<Expense, Error> {
        self.transition(caller, expense_id, ExpenseTransition::Reject, reason)
            .await
    }

    async fn mark_as_paid(
        &self,
        caller: &Caller,
        expense_id: ExpenseId,
    ) -> Result<Expense, Error> {
        self.transition(
            caller,
            expense_id,
            ExpenseTransition::MarkPaid,
            RejectionReason::default(),
        )
        .await
    }

    async fn reassign_project(
        &self,
        caller: &Caller,
        expense_id: ExpenseId,
        project_id: Option<ProjectId>,
    ) -> Result<Expense, Error> {
        authorize(
            self.organizations.as_ref(),
            caller,
            Action::ReassignExpenseProject,
        )
        .await?;
        self.ensure_project_in_organization(caller, project_id)
            .await?;

        self.expenses
            .reassign_project(
                &caller.organization_id,
                expense_id,
                project_id,
                self.clock.utc(),
            )
            .await
            .map_err(map_expense_error)?
            .ok_or_else(|| expense_not_found(expense_id))
    }
}

#[async_trait]
impl<R, O, N> ExpenseQuery for ExpenseService<R, O, N>
where
    R: ExpenseRepository,
    O: OrganizationRepository,
    N: Notifier,
{
    async fn get(&self, caller: &Caller, expense_id: ExpenseId) -> Result<Expense, Error> {
        authorize(self.organizations.as_ref(), caller, Action::ReadRecords).await?;
        self.expenses
            .find(&caller.organization_id, expense_id)
            .await
            .map_err(map_expense_error)?
            .ok_or_else(|| expense_not_found(expense_id))
    }

    async fn list(
        &self,
        caller: &Caller,
        status: Option<ExpenseStatus>,
    ) -> Result<Vec<Expense>, Error> {
        authorize(self.organizations.as_ref(), caller, Action::ReadRecords).await?;
        self.expenses
            .list(&caller.organization_id, status)
            .await
            .map_err(map_expense_error)
    }
}

#[cfg(test)]
#[path = "expense_service_tests.rs"]
mod tests;
