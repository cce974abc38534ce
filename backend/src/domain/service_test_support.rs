//! Shared fixtures for domain service unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;

use crate::domain::ports::MockOrganizationRepository;
use crate::domain::{
    Caller, Expense, ExpenseId, ExpenseStatus, OrganizationId, ProjectId, Role, UserId,
};

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 15, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

pub(crate) fn caller() -> Caller {
    Caller::new(UserId::random(), OrganizationId::random())
}

/// Organization repository answering every role lookup with `role`.
pub(crate) fn organizations_with_role(role: Option<Role>) -> MockOrganizationRepository {
    let mut organizations = MockOrganizationRepository::new();
    organizations
        .expect_find_role()
        .returning(move |_, _| Ok(role));
    organizations
}

pub(crate) fn expense_id(raw: i32) -> ExpenseId {
    ExpenseId::new(raw).expect("valid expense id")
}

pub(crate) fn project_id(raw: i32) -> ProjectId {
    ProjectId::new(raw).expect("valid project id")
}

pub(crate) fn sample_expense(caller: &Caller, id: ExpenseId, status: ExpenseStatus) -> Expense {
    let now = fixture_timestamp();
    Expense {
        id,
        organization_id: caller.organization_id,
        submitted_by: caller.user_id.clone(),
        project_id: None,
        description: "Train to client site".to_owned(),
        amount_cents: 4_250,
        currency: "EUR".to_owned(),
        incurred_on: NaiveDate::from_ymd_opt(2026, 2, 27).expect("valid date"),
        status,
        approved_by: None,
        approved_at: None,
        paid_by: None,
        paid_at: None,
        rejected_by: None,
        rejected_at: None,
        rejection_reason: None,
        created_at: now,
        updated_at: now,
    }
}
