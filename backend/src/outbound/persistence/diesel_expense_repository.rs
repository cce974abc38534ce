//! PostgreSQL-backed `ExpenseRepository` implementation.
//!
//! Status transitions are single `UPDATE ... WHERE status = <from>`
//! statements. PostgreSQL's row lock serialises concurrent attempts, so the
//! loser of a race matches zero rows and the port returns `Ok(None)`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ExpenseRepository, ExpenseRepositoryError, NewExpense};
use crate::domain::{
    Expense, ExpenseId, ExpenseStatus, ExpenseTransition, ExpenseTransitionRequest,
    OrganizationId, ProjectId, UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{ExpenseRow, NewExpenseRow};
use super::pool::{DbPool, PoolError};
use super::schema::expenses;

#[derive(Clone)]
pub struct DieselExpenseRepository {
    pool: DbPool,
}

impl DieselExpenseRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ExpenseRepositoryError {
    map_basic_pool_error(error, |message| ExpenseRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> ExpenseRepositoryError {
    map_basic_diesel_error(
        error,
        ExpenseRepositoryError::query,
        ExpenseRepositoryError::connection,
    )
}

fn corrupt(field: &str, err: impl std::fmt::Display) -> ExpenseRepositoryError {
    ExpenseRepositoryError::query(format!("stored expense {field}: {err}"))
}

fn row_to_expense(row: ExpenseRow) -> Result<Expense, ExpenseRepositoryError> {
    let ExpenseRow {
        id,
        organization_id,
        submitted_by,
        project_id,
        description,
        amount_cents,
        currency,
        incurred_on,
        status,
        approved_by,
        approved_at,
        paid_by,
        paid_at,
        rejected_by,
        rejected_at,
        rejection_reason,
        created_at,
        updated_at,
    } = row;

    Ok(Expense {
        id: ExpenseId::new(id).map_err(|err| corrupt("id", err))?,
        organization_id: OrganizationId::from_uuid(organization_id),
        submitted_by: UserId::from_uuid(submitted_by),
        project_id: project_id
            .map(ProjectId::new)
            .transpose()
            .map_err(|err| corrupt("project_id", err))?,
        description,
        amount_cents,
        currency,
        incurred_on,
        status: status
            .parse::<ExpenseStatus>()
            .map_err(|err| corrupt("status", err))?,
        approved_by: approved_by.map(UserId::from_uuid),
        approved_at,
        paid_by: paid_by.map(UserId::from_uuid),
        paid_at,
        rejected_by: rejected_by.map(UserId::from_uuid),
        rejected_at,
        rejection_reason,
        created_at,
        updated_at,
    })
}

#[async_trait]
impl ExpenseRepository for DieselExpenseRepository {
    async fn insert(&self, expense: &NewExpense) -> Result<Expense, ExpenseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let draft = &expense.draft;

        let row = NewExpenseRow {
            organization_id: *expense.organization_id.as_uuid(),
            submitted_by: *expense.submitted_by.as_uuid(),
            project_id: draft.project_id().map(ProjectId::get),
            description: draft.description(),
            amount_cents: draft.money().amount_cents(),
            currency: draft.money().currency().as_ref(),
            incurred_on: draft.incurred_on(),
            status: ExpenseStatus::Submitted.as_str(),
            created_at: expense.submitted_at,
            updated_at: expense.submitted_at,
        };

        let stored = diesel::insert_into(expenses::table)
            .values(&row)
            .returning(ExpenseRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_expense(stored)
    }

    async fn find(
        &self,
        organization_id: &OrganizationId,
        expense_id: ExpenseId,
    ) -> Result<Option<Expense>, ExpenseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = expenses::table
            .filter(expenses::id.eq(expense_id.get()))
            .filter(expenses::organization_id.eq(organization_id.as_uuid()))
            .select(ExpenseRow::as_select())
            .first::<ExpenseRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_expense).transpose()
    }

    async fn list(
        &self,
        organization_id: &OrganizationId,
        status: Option<ExpenseStatus>,
    ) -> Result<Vec<Expense>, ExpenseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = expenses::table
            .filter(expenses::organization_id.eq(*organization_id.as_uuid()))
            .into_boxed();
        if let Some(status) = status {
            query = query.filter(expenses::status.eq(status.as_str()));
        }

        let rows: Vec<ExpenseRow> = query
            .order((expenses::created_at.desc(), expenses::id.desc()))
            .select(ExpenseRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_expense).collect()
    }

    async fn apply_transition(
        &self,
        request: &ExpenseTransitionRequest,
    ) -> Result<Option<Expense>, ExpenseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let target = expenses::table
            .filter(expenses::id.eq(request.expense_id.get()))
            .filter(expenses::organization_id.eq(*request.organization_id.as_uuid()))
            .filter(expenses::status.eq(request.transition.from().as_str()));
        let next = request.transition.to().as_str();
        let actor = *request.actor.as_uuid();
        let at = request.at;

        let row = match request.transition {
            ExpenseTransition::Approve => {
                diesel::update(target)
                    .set((
                        expenses::status.eq(next),
                        expenses::approved_by.eq(actor),
                        expenses::approved_at.eq(at),
                        expenses::updated_at.eq(at),
                    ))
                    .returning(ExpenseRow::as_returning())
                    .get_result(&mut conn)
                    .await
            }
            ExpenseTransition::Reject => {
                diesel::update(target)
                    .set((
                        expenses::status.eq(next),
                        expenses::rejected_by.eq(actor),
                        expenses::rejected_at.eq(at),
                        expenses::rejection_reason.eq(request.reason.as_deref()),
                        expenses::updated_at.eq(at),
                    ))
                    .returning(ExpenseRow::as_returning())
                    .get_result(&mut conn)
                    .await
            }
            ExpenseTransition::MarkPaid => {
                diesel::update(target)
                    .set((
                        expenses::status.eq(next),
                        expenses::paid_by.eq(actor),
                        expenses::paid_at.eq(at),
                        expenses::updated_at.eq(at),
                    ))
                    .returning(ExpenseRow::as_returning())
                    .get_result(&mut conn)
                    .await
            }
        }
        .optional()
        .map_err(map_diesel_error)?;

        row.map(row_to_expense).transpose()
    }

    async fn reassign_project(
        &self,
        organization_id: &OrganizationId,
        expense_id: ExpenseId,
        project_id: Option<ProjectId>,
        at: DateTime<Utc>,
    ) -> Result<Option<Expense>, ExpenseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::update(
            expenses::table
                .filter(expenses::id.eq(expense_id.get()))
                .filter(expenses::organization_id.eq(*organization_id.as_uuid())),
        )
        .set((
            expenses::project_id.eq(project_id.map(ProjectId::get)),
            expenses::updated_at.eq(at),
        ))
        .returning(ExpenseRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        row.map(row_to_expense).transpose()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    use super::*;

    #[fixture]
    fn valid_row() -> ExpenseRow {
        let now = Utc::now();
        ExpenseRow {
            id: 17,
            organization_id: Uuid::new_v4(),
            submitted_by: Uuid::new_v4(),
            project_id: Some(3),
            description: "Conference ticket".to_owned(),
            amount_cents: 35_000,
            currency: "EUR".to_owned(),
            incurred_on: NaiveDate::from_ymd_opt(2026, 1, 12).expect("valid date"),
            status: "approved".to_owned(),
            approved_by: Some(Uuid::new_v4()),
            approved_at: Some(now),
            paid_by: None,
            paid_at: None,
            rejected_by: None,
            rejected_at: None,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let repo_err = map_pool_error(PoolError::checkout("connection refused"));

        assert!(matches!(repo_err, ExpenseRepositoryError::Connection { .. }));
        assert!(repo_err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn diesel_error_maps_to_query_error() {
        let repo_err = map_diesel_error(diesel::result::Error::NotFound);

        assert!(matches!(repo_err, ExpenseRepositoryError::Query { .. }));
        assert!(repo_err.to_string().contains("record not found"));
    }

    #[rstest]
    fn row_conversion_maps_typed_fields(valid_row: ExpenseRow) {
        let expense = row_to_expense(valid_row).expect("valid row");

        assert_eq!(expense.id.get(), 17);
        assert_eq!(expense.status, ExpenseStatus::Approved);
        assert_eq!(expense.project_id.map(ProjectId::get), Some(3));
    }

    #[rstest]
    fn row_conversion_rejects_unknown_status(mut valid_row: ExpenseRow) {
        valid_row.status = "archived".to_owned();

        let error = row_to_expense(valid_row).expect_err("unknown status");
        assert!(error.to_string().contains("stored expense status"));
    }

    #[rstest]
    fn row_conversion_rejects_non_positive_project(mut valid_row: ExpenseRow) {
        valid_row.project_id = Some(0);

        let error = row_to_expense(valid_row).expect_err("bad project id");
        assert!(matches!(error, ExpenseRepositoryError::Query { .. }));
    }
}
