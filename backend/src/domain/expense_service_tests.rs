//! Tests for the expense service.

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{MockExpenseRepository, MockNotifier, MockOrganizationRepository};
use crate::domain::service_test_support::{
    caller, expense_id, fixture_clock, fixture_timestamp, organizations_with_role, project_id,
    sample_expense,
};
use crate::domain::Role;
use chrono::NaiveDate;
use rstest::rstest;

type TestService = ExpenseService<MockExpenseRepository, MockOrganizationRepository, MockNotifier>;

fn service(
    expenses: MockExpenseRepository,
    organizations: MockOrganizationRepository,
    notifier: MockNotifier,
) -> TestService {
    ExpenseService::new(
        Arc::new(expenses),
        Arc::new(organizations),
        Arc::new(notifier),
        fixture_clock(),
    )
}

fn silent_notifier() -> MockNotifier {
    let mut notifier = MockNotifier::new();
    notifier.expect_notify().returning(|_, _, _, _| Ok(()));
    notifier
}

fn draft(project: Option<ProjectId>) -> ExpenseDraft {
    ExpenseDraft::new(
        "Hotel",
        12_000,
        "usd",
        NaiveDate::from_ymd_opt(2026, 2, 20).expect("valid date"),
        project,
    )
    .expect("valid draft")
}

#[rstest]
#[case(Role::Admin)]
#[case(Role::Manager)]
#[case(Role::ProjectManager)]
#[tokio::test]
async fn approve_applies_transition_and_notifies_submitter(#[case] role: Role) {
    let caller = caller();
    let id = expense_id(5);
    let approved = sample_expense(&caller, id, ExpenseStatus::Approved);
    let submitter = approved.submitted_by.clone();
    let actor = caller.user_id.clone();

    let mut expenses = MockExpenseRepository::new();
    expenses
        .expect_apply_transition()
        .withf(move |request| {
            request.expense_id == id
                && request.transition == ExpenseTransition::Approve
                && request.actor == actor
                && request.at == fixture_timestamp()
        })
        .times(1)
        .return_once(move |_| Ok(Some(approved)));
    let mut notifier = MockNotifier::new();
    notifier
        .expect_notify()
        .withf(move |user, _, kind, message| {
            *user == submitter && kind == "expense_approved" && message.contains("approved")
        })
        .times(1)
        .returning(|_, _, _, _| Ok(()));

    let service = service(expenses, organizations_with_role(Some(role)), notifier);
    let expense = service.approve(&caller, id).await.expect("approval succeeds");

    assert_eq!(expense.status, ExpenseStatus::Approved);
}

#[rstest]
#[tokio::test]
async fn approve_conflicts_when_no_row_matches() {
    let caller = caller();
    let mut expenses = MockExpenseRepository::new();
    expenses
        .expect_apply_transition()
        .times(1)
        .return_once(|_| Ok(None));
    let mut notifier = MockNotifier::new();
    notifier.expect_notify().never();

    let service = service(expenses, organizations_with_role(Some(Role::Admin)), notifier);
    let err = service
        .approve(&caller, expense_id(9))
        .await
        .expect_err("already decided");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(
        err.message(),
        "expense 9 cannot be approved: it is missing or not submitted"
    );
}

#[rstest]
#[case(Role::Member)]
#[case(Role::Finance)]
#[tokio::test]
async fn approve_is_forbidden_for_non_reviewers(#[case] role: Role) {
    let mut expenses = MockExpenseRepository::new();
    expenses.expect_apply_transition().never();

    let service = service(
        expenses,
        organizations_with_role(Some(role)),
        MockNotifier::new(),
    );
    let err = service
        .approve(&caller(), expense_id(1))
        .await
        .expect_err("role lacks permission");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[case(Role::Manager, ErrorCode::Forbidden)]
#[case(Role::Finance, ErrorCode::Conflict)]
#[tokio::test]
async fn mark_as_paid_requires_payer_and_approved_status(
    #[case] role: Role,
    #[case] expected: ErrorCode,
) {
    let mut expenses = MockExpenseRepository::new();
    expenses
        .expect_apply_transition()
        .withf(|request| request.transition == ExpenseTransition::MarkPaid)
        .returning(|_| Ok(None));

    let service = service(
        expenses,
        organizations_with_role(Some(role)),
        silent_notifier(),
    );
    let err = service
        .mark_as_paid(&caller(), expense_id(3))
        .await
        .expect_err("cannot pay");

    assert_eq!(err.code(), expected);
}

#[rstest]
#[tokio::test]
async fn reject_passes_reason_to_repository_and_message() {
    let caller = caller();
    let id = expense_id(4);
    let mut rejected = sample_expense(&caller, id, ExpenseStatus::Rejected);
    rejected.rejection_reason = Some("missing receipt".to_owned());

    let mut expenses = MockExpenseRepository::new();
    expenses
        .expect_apply_transition()
        .withf(|request| request.reason.as_deref() == Some("missing receipt"))
        .times(1)
        .return_once(move |_| Ok(Some(rejected)));
    let mut notifier = MockNotifier::new();
    notifier
        .expect_notify()
        .withf(|_, _, kind, message| {
            kind == "expense_rejected" && message.ends_with("Reason: missing receipt")
        })
        .times(1)
        .returning(|_, _, _, _| Ok(()));

    let service = service(expenses, organizations_with_role(Some(Role::Manager)), notifier);
    let reason = RejectionReason::new(Some("missing receipt")).expect("valid reason");
    let expense = service
        .reject(&caller, id, reason)
        .await
        .expect("rejection succeeds");

    assert_eq!(expense.status, ExpenseStatus::Rejected);
}

#[rstest]
#[tokio::test]
async fn notifier_failure_does_not_fail_transition() {
    let caller = caller();
    let id = expense_id(8);
    let paid = sample_expense(&caller, id, ExpenseStatus::Paid);

    let mut expenses = MockExpenseRepository::new();
    expenses
        .expect_apply_transition()
        .times(1)
        .return_once(move |_| Ok(Some(paid)));
    let mut notifier = MockNotifier::new();
    notifier
        .expect_notify()
        .times(1)
        .returning(|_, _, _, _| Err(Error::service_unavailable("notifications down")));

    let service = service(expenses, organizations_with_role(Some(Role::Finance)), notifier);
    let expense = service
        .mark_as_paid(&caller, id)
        .await
        .expect("payment still succeeds");

    assert_eq!(expense.status, ExpenseStatus::Paid);
}

#[rstest]
#[tokio::test]
async fn submit_rejects_project_from_another_organization() {
    let mut organizations = organizations_with_role(Some(Role::Member));
    organizations
        .expect_owns_project()
        .times(1)
        .returning(|_, _| Ok(false));
    let mut expenses = MockExpenseRepository::new();
    expenses.expect_insert().never();

    let service = service(expenses, organizations, MockNotifier::new());
    let err = service
        .submit(&caller(), draft(Some(project_id(77))))
        .await
        .expect_err("foreign project");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        err.details().and_then(|details| details.get("field")),
        Some(&serde_json::json!("projectId"))
    );
}

#[rstest]
#[tokio::test]
async fn submit_records_submitter_and_timestamp() {
    let caller = caller();
    let submitter = caller.user_id.clone();
    let stored = sample_expense(&caller, expense_id(1), ExpenseStatus::Submitted);

    let mut expenses = MockExpenseRepository::new();
    expenses
        .expect_insert()
        .withf(move |new| {
            new.submitted_by == submitter
                && new.submitted_at == fixture_timestamp()
                && new.draft.money().currency().as_ref() == "USD"
        })
        .times(1)
        .return_once(move |_| Ok(stored));

    let service = service(
        expenses,
        organizations_with_role(Some(Role::Member)),
        MockNotifier::new(),
    );
    let expense = service
        .submit(&caller, draft(None))
        .await
        .expect("submission succeeds");

    assert_eq!(expense.status, ExpenseStatus::Submitted);
}

#[rstest]
#[tokio::test]
async fn reassign_reports_missing_expense() {
    let mut organizations = organizations_with_role(Some(Role::Finance));
    organizations
        .expect_owns_project()
        .returning(|_, _| Ok(true));
    let mut expenses = MockExpenseRepository::new();
    expenses
        .expect_reassign_project()
        .times(1)
        .returning(|_, _, _, _| Ok(None));

    let service = service(expenses, organizations, MockNotifier::new());
    let err = service
        .reassign_project(&caller(), expense_id(12), Some(project_id(2)))
        .await
        .expect_err("missing expense");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(
    ExpenseRepositoryError::connection("pool exhausted"),
    ErrorCode::ServiceUnavailable
)]
#[case(ExpenseRepositoryError::query("syntax"), ErrorCode::InternalError)]
#[tokio::test]
async fn list_maps_repository_errors(
    #[case] failure: ExpenseRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut expenses = MockExpenseRepository::new();
    expenses
        .expect_list()
        .times(1)
        .return_once(move |_, _| Err(failure));

    let service = service(
        expenses,
        organizations_with_role(Some(Role::Member)),
        MockNotifier::new(),
    );
    let err = service
        .list(&caller(), None)
        .await
        .expect_err("repository failed");

    assert_eq!(err.code(), expected);
}

#[rstest]
#[tokio::test]
async fn non_members_cannot_read_expenses() {
    let mut expenses = MockExpenseRepository::new();
    expenses.expect_find().never();

    let service = service(expenses, organizations_with_role(None), MockNotifier::new());
    let err = service
        .get(&caller(), expense_id(1))
        .await
        .expect_err("not a member");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}
