//! Expense HTTP handlers.
//!
//! ```text
//! GET   /api/v1/expenses?organizationId=..&status=..
//! POST  /api/v1/expenses?organizationId=..
//! GET   /api/v1/expenses/{id}?organizationId=..
//! POST  /api/v1/expenses/{id}/approve?organizationId=..
//! POST  /api/v1/expenses/{id}/reject?organizationId=..
//! POST  /api/v1/expenses/{id}/pay?organizationId=..
//! PATCH /api/v1/finance/expenses/{id}?organizationId=..
//! ```
//!
//! Every route also accepts the legacy `userId` query parameter, which must
//! name the signed-in user.

use actix_web::{HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Error, Expense, ExpenseDraft, ExpenseId, ExpenseStatus, ExpenseValidationError, ProjectId,
    RejectionReason,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{ApiResponse, created, ok};
use crate::inbound::http::schemas::{ErrorEnvelopeSchema, ExpenseSchema};
use crate::inbound::http::scope::OrganizationScope;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, ID, invalid_value_error, money_error, parse_date, parse_optional_status,
    parse_record_id, record_id_from_number,
};

const PROJECT_ID: FieldName = FieldName::new("projectId");

/// Query parameters for listing expenses.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseListQuery {
    #[serde(flatten)]
    pub scope: OrganizationScope,
    pub status: Option<String>,
}

/// Request body for `POST /api/v1/expenses`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitExpenseRequest {
    pub description: String,
    #[schema(example = 1250)]
    pub amount_cents: i64,
    #[schema(example = "EUR")]
    pub currency: String,
    #[schema(format = "date", example = "2026-03-01")]
    pub incurred_on: String,
    pub project_id: Option<i64>,
}

/// Optional request body for `POST /api/v1/expenses/{id}/reject`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RejectExpenseRequest {
    pub reason: Option<String>,
}

/// Request body for `PATCH /api/v1/finance/expenses/{id}`.
///
/// A missing or `null` `projectId` detaches the expense from its project.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReassignProjectRequest {
    pub project_id: Option<i64>,
}

fn map_expense_validation_error(err: &ExpenseValidationError) -> Error {
    match err {
        ExpenseValidationError::EmptyDescription
        | ExpenseValidationError::DescriptionTooLong { .. } => {
            invalid_value_error(FieldName::new("description"), err)
        }
        ExpenseValidationError::ReasonTooLong { .. } => {
            invalid_value_error(FieldName::new("reason"), err)
        }
        ExpenseValidationError::Money(money) => money_error(money),
    }
}

fn parse_project_id(raw: Option<i64>) -> Result<Option<ProjectId>, Error> {
    raw.map(|value| record_id_from_number(value, PROJECT_ID, ProjectId::new))
        .transpose()
}

fn parse_submission(body: SubmitExpenseRequest) -> Result<ExpenseDraft, Error> {
    let incurred_on = parse_date(&body.incurred_on, FieldName::new("incurredOn"))?;
    let project_id = parse_project_id(body.project_id)?;
    ExpenseDraft::new(
        &body.description,
        body.amount_cents,
        &body.currency,
        incurred_on,
        project_id,
    )
    .map_err(|err| map_expense_validation_error(&err))
}

fn parse_expense_id(raw: &str) -> ApiResult<ExpenseId> {
    parse_record_id(raw, ID, ExpenseId::parse)
}

/// List the organization's expenses, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/expenses",
    params(
        ("organizationId" = String, Query, format = Uuid, description = "Organization to read"),
        ("userId" = Option<String>, Query, format = Uuid, description = "Must equal the session user"),
        ("status" = Option<String>, Query, description = "submitted, approved, paid or rejected")
    ),
    responses(
        (status = 200, description = "Expenses (enveloped)", body = [ExpenseSchema]),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Forbidden", body = ErrorEnvelopeSchema),
        (status = 503, description = "Service unavailable", body = ErrorEnvelopeSchema)
    ),
    tags = ["expenses"],
    operation_id = "listExpenses",
    security(("SessionCookie" = []))
)]
#[get("/expenses")]
pub async fn list_expenses(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ExpenseListQuery>,
) -> ApiResponse<Vec<Expense>> {
    let caller = query.scope.caller(&session)?;
    let status =
        parse_optional_status::<ExpenseStatus>(query.status.as_deref(), FieldName::new("status"))?;
    let expenses = state.expenses_query.list(&caller, status).await?;
    Ok(ok(expenses))
}

/// Submit a new expense on behalf of the signed-in user.
#[utoipa::path(
    post,
    path = "/api/v1/expenses",
    request_body = SubmitExpenseRequest,
    params(
        ("organizationId" = String, Query, format = Uuid, description = "Organization to submit to"),
        ("userId" = Option<String>, Query, format = Uuid, description = "Must equal the session user")
    ),
    responses(
        (status = 201, description = "Expense submitted (enveloped)", body = ExpenseSchema),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Forbidden", body = ErrorEnvelopeSchema),
        (status = 503, description = "Service unavailable", body = ErrorEnvelopeSchema)
    ),
    tags = ["expenses"],
    operation_id = "submitExpense",
    security(("SessionCookie" = []))
)]
#[post("/expenses")]
pub async fn submit_expense(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<OrganizationScope>,
    payload: web::Json<SubmitExpenseRequest>,
) -> ApiResult<HttpResponse> {
    let caller = query.caller(&session)?;
    let draft = parse_submission(payload.into_inner())?;
    let expense = state.expenses.submit(&caller, draft).await?;
    Ok(created(expense))
}

/// Fetch one expense of the organization.
#[utoipa::path(
    get,
    path = "/api/v1/expenses/{id}",
    params(
        ("id" = i32, Path, description = "Expense identifier"),
        ("organizationId" = String, Query, format = Uuid, description = "Organization to read"),
        ("userId" = Option<String>, Query, format = Uuid, description = "Must equal the session user")
    ),
    responses(
        (status = 200, description = "Expense (enveloped)", body = ExpenseSchema),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Forbidden", body = ErrorEnvelopeSchema),
        (status = 404, description = "Not found", body = ErrorEnvelopeSchema)
    ),
    tags = ["expenses"],
    operation_id = "getExpense",
    security(("SessionCookie" = []))
)]
#[get("/expenses/{id}")]
pub async fn get_expense(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<OrganizationScope>,
) -> ApiResponse<Expense> {
    let caller = query.caller(&session)?;
    let expense_id = parse_expense_id(&path)?;
    let expense = state.expenses_query.get(&caller, expense_id).await?;
    Ok(ok(expense))
}

/// Approve a submitted expense (`submitted → approved`).
#[utoipa::path(
    post,
    path = "/api/v1/expenses/{id}/approve",
    params(
        ("id" = i32, Path, description = "Expense identifier"),
        ("organizationId" = String, Query, format = Uuid, description = "Organization owning the expense"),
        ("userId" = Option<String>, Query, format = Uuid, description = "Must equal the session user")
    ),
    responses(
        (status = 200, description = "Expense approved (enveloped)", body = ExpenseSchema),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Role may not approve", body = ErrorEnvelopeSchema),
        (status = 409, description = "Expense missing or not submitted", body = ErrorEnvelopeSchema)
    ),
    tags = ["expenses"],
    operation_id = "approveExpense",
    security(("SessionCookie" = []))
)]
#[post("/expenses/{id}/approve")]
pub async fn approve_expense(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<OrganizationScope>,
) -> ApiResponse<Expense> {
    let caller = query.caller(&session)?;
    let expense_id = parse_expense_id(&path)?;
    let expense = state.expenses.approve(&caller, expense_id).await?;
    Ok(ok(expense))
}

/// Reject a submitted expense (`submitted → rejected`).
#[utoipa::path(
    post,
    path = "/api/v1/expenses/{id}/reject",
    request_body(content = Option<RejectExpenseRequest>, description = "Optional rejection reason"),
    params(
        ("id" = i32, Path, description = "Expense identifier"),
        ("organizationId" = String, Query, format = Uuid, description = "Organization owning the expense"),
        ("userId" = Option<String>, Query, format = Uuid, description = "Must equal the session user")
    ),
    responses(
        (status = 200, description = "Expense rejected (enveloped)", body = ExpenseSchema),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Role may not reject", body = ErrorEnvelopeSchema),
        (status = 409, description = "Expense missing or not submitted", body = ErrorEnvelopeSchema)
    ),
    tags = ["expenses"],
    operation_id = "rejectExpense",
    security(("SessionCookie" = []))
)]
#[post("/expenses/{id}/reject")]
pub async fn reject_expense(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<OrganizationScope>,
    payload: Option<web::Json<RejectExpenseRequest>>,
) -> ApiResponse<Expense> {
    let caller = query.caller(&session)?;
    let expense_id = parse_expense_id(&path)?;
    let body = payload.map(web::Json::into_inner).unwrap_or_default();
    let reason = RejectionReason::new(body.reason.as_deref())
        .map_err(|err| map_expense_validation_error(&err))?;
    let expense = state.expenses.reject(&caller, expense_id, reason).await?;
    Ok(ok(expense))
}

/// Pay an approved expense (`approved → paid`).
#[utoipa::path(
    post,
    path = "/api/v1/expenses/{id}/pay",
    params(
        ("id" = i32, Path, description = "Expense identifier"),
        ("organizationId" = String, Query, format = Uuid, description = "Organization owning the expense"),
        ("userId" = Option<String>, Query, format = Uuid, description = "Must equal the session user")
    ),
    responses(
        (status = 200, description = "Expense paid (enveloped)", body = ExpenseSchema),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Role may not pay", body = ErrorEnvelopeSchema),
        (status = 409, description = "Expense missing or not approved", body = ErrorEnvelopeSchema)
    ),
    tags = ["expenses"],
    operation_id = "payExpense",
    security(("SessionCookie" = []))
)]
#[post("/expenses/{id}/pay")]
pub async fn pay_expense(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<OrganizationScope>,
) -> ApiResponse<Expense> {
    let caller = query.caller(&session)?;
    let expense_id = parse_expense_id(&path)?;
    let expense = state.expenses.mark_as_paid(&caller, expense_id).await?;
    Ok(ok(expense))
}

/// Move an expense to another project of the organization.
#[utoipa::path(
    patch,
    path = "/api/v1/finance/expenses/{id}",
    request_body = ReassignProjectRequest,
    params(
        ("id" = i32, Path, description = "Expense identifier"),
        ("organizationId" = String, Query, format = Uuid, description = "Organization owning the expense"),
        ("userId" = Option<String>, Query, format = Uuid, description = "Must equal the session user")
    ),
    responses(
        (status = 200, description = "Expense updated (enveloped)", body = ExpenseSchema),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Forbidden", body = ErrorEnvelopeSchema),
        (status = 404, description = "Expense not found", body = ErrorEnvelopeSchema)
    ),
    tags = ["finance"],
    operation_id = "reassignExpenseProject",
    security(("SessionCookie" = []))
)]
#[patch("/finance/expenses/{id}")]
pub async fn reassign_expense_project(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<OrganizationScope>,
    payload: web::Json<ReassignProjectRequest>,
) -> ApiResponse<Expense> {
    let caller = query.caller(&session)?;
    let expense_id = parse_expense_id(&path)?;
    let project_id = parse_project_id(payload.project_id)?;
    let expense = state
        .expenses
        .reassign_project(&caller, expense_id, project_id)
        .await?;
    Ok(ok(expense))
}

#[cfg(test)]
#[path = "expenses_tests.rs"]
mod tests;
