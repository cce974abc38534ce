//! Tests for the expense handlers.

use super::*;
use crate::domain::ports::{MockExpenseCommand, MockExpenseQuery};
use crate::domain::{Caller, OrganizationId, UserId};
use crate::inbound::http::test_utils::{
    fixture_user_id, login_and_get_cookie, read_data, read_error_code, test_app,
};
use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use chrono::{NaiveDate, TimeZone, Utc};
use rstest::rstest;
use serde_json::{Value, json};
use std::sync::Arc;

const ORG: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

fn organization() -> OrganizationId {
    OrganizationId::from_uuid(ORG.parse().expect("valid org uuid"))
}

fn expected_caller() -> Caller {
    Caller::new(fixture_user_id(), organization())
}

fn sample_expense(id: i32, status: ExpenseStatus) -> Expense {
    let at = Utc
        .with_ymd_and_hms(2026, 3, 2, 9, 30, 0)
        .single()
        .expect("valid timestamp");
    Expense {
        id: ExpenseId::new(id).expect("valid id"),
        organization_id: organization(),
        submitted_by: fixture_user_id(),
        project_id: None,
        description: "Train tickets".to_owned(),
        amount_cents: 4_250,
        currency: "EUR".to_owned(),
        incurred_on: NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid date"),
        status,
        approved_by: None,
        approved_at: None,
        paid_by: None,
        paid_at: None,
        rejected_by: None,
        rejected_at: None,
        rejection_reason: None,
        created_at: at,
        updated_at: at,
    }
}

fn state_with(command: MockExpenseCommand, query: MockExpenseQuery) -> HttpState {
    HttpState {
        expenses: Arc::new(command),
        expenses_query: Arc::new(query),
        ..HttpState::fixtures()
    }
}

fn post(uri: &str, cookie: &Cookie<'static>) -> actix_test::TestRequest {
    actix_test::TestRequest::post()
        .uri(uri)
        .cookie(cookie.clone())
}

#[actix_web::test]
async fn approve_passes_session_caller_and_id() {
    let mut command = MockExpenseCommand::new();
    command
        .expect_approve()
        .withf(|caller, id| caller == &expected_caller() && id.get() == 42)
        .times(1)
        .return_once(|_, _| Ok(sample_expense(42, ExpenseStatus::Approved)));
    let app = actix_test::init_service(test_app(state_with(command, MockExpenseQuery::new()))).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        post(&format!("/api/v1/expenses/42/approve?organizationId={ORG}"), &cookie).to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let data = read_data(response).await;
    assert_eq!(data["status"], json!("approved"));
    assert_eq!(data["amountCents"], json!(4_250));
    assert_eq!(data["incurredOn"], json!("2026-03-01"));
}

#[actix_web::test]
async fn mismatched_user_id_is_forbidden_before_the_command_runs() {
    let mut command = MockExpenseCommand::new();
    command.expect_approve().never();
    let app = actix_test::init_service(test_app(state_with(command, MockExpenseQuery::new()))).await;
    let cookie = login_and_get_cookie(&app).await;
    let other = UserId::random();

    let response = actix_test::call_service(
        &app,
        post(
            &format!("/api/v1/expenses/42/approve?organizationId={ORG}&userId={other}"),
            &cookie,
        )
        .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.pointer("/error/details/code"), Some(&json!("user_mismatch")));
}

#[actix_web::test]
async fn matching_user_id_is_accepted() {
    let mut command = MockExpenseCommand::new();
    command
        .expect_mark_as_paid()
        .times(1)
        .return_once(|_, _| Ok(sample_expense(5, ExpenseStatus::Paid)));
    let app = actix_test::init_service(test_app(state_with(command, MockExpenseQuery::new()))).await;
    let cookie = login_and_get_cookie(&app).await;
    let own = fixture_user_id();

    let response = actix_test::call_service(
        &app,
        post(
            &format!("/api/v1/expenses/5/pay?organizationId={ORG}&userId={own}"),
            &cookie,
        )
        .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_data(response).await["status"], json!("paid"));
}

#[actix_web::test]
async fn workflow_conflict_maps_to_409() {
    let app = actix_test::init_service(test_app(HttpState::fixtures())).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        post(&format!("/api/v1/expenses/9/approve?organizationId={ORG}"), &cookie).to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(read_error_code(response).await, "conflict");
}

#[rstest]
#[case("0")]
#[case("-3")]
#[case("abc")]
#[case("2147483648")]
#[actix_web::test]
async fn malformed_expense_ids_are_rejected(#[case] raw: &str) {
    let app = actix_test::init_service(test_app(HttpState::fixtures())).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        post(&format!("/api/v1/expenses/{raw}/approve?organizationId={ORG}"), &cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.pointer("/error/details/code"), Some(&json!("invalid_id")));
}

#[actix_web::test]
async fn missing_organization_is_a_missing_field() {
    let app = actix_test::init_service(test_app(HttpState::fixtures())).await;
    let cookie = login_and_get_cookie(&app).await;

    let response =
        actix_test::call_service(&app, post("/api/v1/expenses/1/approve", &cookie).to_request())
            .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.pointer("/error/details/field"), Some(&json!("organizationId")));
    assert_eq!(body.pointer("/error/details/code"), Some(&json!("missing_field")));
}

#[actix_web::test]
async fn anonymous_requests_are_unauthorised() {
    let app = actix_test::init_service(test_app(HttpState::fixtures())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/expenses?organizationId={ORG}"))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(read_error_code(response).await, "unauthorized");
}

#[actix_web::test]
async fn submit_returns_created_expense() {
    let mut command = MockExpenseCommand::new();
    command
        .expect_submit()
        .withf(|caller, draft| {
            caller == &expected_caller()
                && draft.description() == "Train tickets"
                && draft.money().amount_cents() == 4_250
                && draft.money().currency().as_ref() == "EUR"
                && draft.project_id().map(ProjectId::get) == Some(3)
        })
        .times(1)
        .return_once(|_, _| Ok(sample_expense(11, ExpenseStatus::Submitted)));
    let app = actix_test::init_service(test_app(state_with(command, MockExpenseQuery::new()))).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        post(&format!("/api/v1/expenses?organizationId={ORG}"), &cookie)
            .set_json(json!({
                "description": "Train tickets",
                "amountCents": 4_250,
                "currency": "eur",
                "incurredOn": "2026-03-01",
                "projectId": 3,
            }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let data = read_data(response).await;
    assert_eq!(data["id"], json!(11));
    assert_eq!(data["status"], json!("submitted"));
}

#[rstest]
#[case(json!({"description": "", "amountCents": 100, "currency": "EUR", "incurredOn": "2026-03-01"}), "description")]
#[case(json!({"description": "Taxi", "amountCents": 0, "currency": "EUR", "incurredOn": "2026-03-01"}), "amountCents")]
#[case(json!({"description": "Taxi", "amountCents": 100, "currency": "EURO", "incurredOn": "2026-03-01"}), "currency")]
#[case(json!({"description": "Taxi", "amountCents": 100, "currency": "EUR", "incurredOn": "01/03/2026"}), "incurredOn")]
#[case(json!({"description": "Taxi", "amountCents": 100, "currency": "EUR", "incurredOn": "2026-03-01", "projectId": 0}), "projectId")]
#[actix_web::test]
async fn submit_rejects_invalid_bodies(#[case] body: Value, #[case] field: &str) {
    let mut command = MockExpenseCommand::new();
    command.expect_submit().never();
    let app = actix_test::init_service(test_app(state_with(command, MockExpenseQuery::new()))).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        post(&format!("/api/v1/expenses?organizationId={ORG}"), &cookie)
            .set_json(body)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.pointer("/error/details/field"), Some(&json!(field)));
}

#[actix_web::test]
async fn reject_forwards_the_reason() {
    let mut command = MockExpenseCommand::new();
    command
        .expect_reject()
        .withf(|_, id, reason| id.get() == 8 && reason.as_deref() == Some("duplicate receipt"))
        .times(1)
        .return_once(|_, _, _| Ok(sample_expense(8, ExpenseStatus::Rejected)));
    let app = actix_test::init_service(test_app(state_with(command, MockExpenseQuery::new()))).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        post(&format!("/api/v1/expenses/8/reject?organizationId={ORG}"), &cookie)
            .set_json(json!({"reason": "duplicate receipt"}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_data(response).await["status"], json!("rejected"));
}

#[actix_web::test]
async fn reject_without_a_body_has_no_reason() {
    let mut command = MockExpenseCommand::new();
    command
        .expect_reject()
        .withf(|_, _, reason| reason.as_deref().is_none())
        .times(1)
        .return_once(|_, _, _| Ok(sample_expense(8, ExpenseStatus::Rejected)));
    let app = actix_test::init_service(test_app(state_with(command, MockExpenseQuery::new()))).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        post(&format!("/api/v1/expenses/8/reject?organizationId={ORG}"), &cookie).to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[rstest]
#[case(json!({"projectId": null}), None)]
#[case(json!({"projectId": 4}), Some(4))]
#[actix_web::test]
async fn reassign_forwards_the_target_project(
    #[case] body: Value,
    #[case] expected: Option<i32>,
) {
    let mut command = MockExpenseCommand::new();
    command
        .expect_reassign_project()
        .withf(move |_, id, project| id.get() == 6 && project.map(ProjectId::get) == expected)
        .times(1)
        .return_once(|_, _, _| Ok(sample_expense(6, ExpenseStatus::Approved)));
    let app = actix_test::init_service(test_app(state_with(command, MockExpenseQuery::new()))).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/v1/finance/expenses/6?organizationId={ORG}"))
            .cookie(cookie)
            .set_json(body)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[actix_web::test]
async fn list_applies_the_status_filter() {
    let mut query = MockExpenseQuery::new();
    query
        .expect_list()
        .withf(|caller, status| {
            caller == &expected_caller() && *status == Some(ExpenseStatus::Approved)
        })
        .times(1)
        .return_once(|_, _| Ok(vec![sample_expense(2, ExpenseStatus::Approved)]));
    let app = actix_test::init_service(test_app(state_with(MockExpenseCommand::new(), query))).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/expenses?organizationId={ORG}&status=approved"))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let data = read_data(response).await;
    assert_eq!(data.as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn list_rejects_unknown_status() {
    let app = actix_test::init_service(test_app(HttpState::fixtures())).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/expenses?organizationId={ORG}&status=archived"))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_error_code(response).await, "invalid_request");
}

#[actix_web::test]
async fn get_returns_not_found_from_the_query_port() {
    let app = actix_test::init_service(test_app(HttpState::fixtures())).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/expenses/77?organizationId={ORG}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
