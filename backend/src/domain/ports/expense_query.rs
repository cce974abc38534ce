//! Driving port for expense reads.

use async_trait::async_trait;

use crate::domain::{Caller, Error, Expense, ExpenseId, ExpenseStatus};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExpenseQuery: Send + Sync {
    /// Fetch one expense of the caller's organization.
    async fn get(&self, caller: &Caller, expense_id: ExpenseId) -> Result<Expense, Error>;

    /// List the organization's expenses, newest first.
    async fn list(
        &self,
        caller: &Caller,
        status: Option<ExpenseStatus>,
    ) -> Result<Vec<Expense>, Error>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureExpenseQuery;

#[async_trait]
impl ExpenseQuery for FixtureExpenseQuery {
    async fn get(&self, _caller: &Caller, expense_id: ExpenseId) -> Result<Expense, Error> {
        Err(Error::not_found(format!("expense {expense_id} not found")))
    }

    async fn list(
        &self,
        _caller: &Caller,
        _status: Option<ExpenseStatus>,
    ) -> Result<Vec<Expense>, Error> {
        Ok(Vec::new())
    }
}
