//! Vendor bill HTTP handlers (finance only).
//!
//! ```text
//! GET  /api/v1/finance/vendor-bills?organizationId=..&status=unpaid
//! POST /api/v1/finance/vendor-bills?organizationId=..
//! POST /api/v1/finance/vendor-bills/{id}/pay?organizationId=..
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Error, VendorBill, VendorBillDraft, VendorBillId, VendorBillStatus, VendorBillValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{ApiResponse, created, ok};
use crate::inbound::http::schemas::{ErrorEnvelopeSchema, VendorBillSchema};
use crate::inbound::http::scope::OrganizationScope;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, ID, invalid_value_error, money_error, parse_date, parse_optional_status,
    parse_record_id,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorBillListQuery {
    #[serde(flatten)]
    pub scope: OrganizationScope,
    pub status: Option<String>,
}

/// Request body for `POST /api/v1/finance/vendor-bills`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVendorBillRequest {
    #[schema(example = "Acme Office Supplies")]
    pub vendor_name: String,
    pub amount_cents: i64,
    #[schema(example = "USD")]
    pub currency: String,
    #[schema(format = "date", example = "2026-04-30")]
    pub due_on: String,
}

fn parse_bill(body: CreateVendorBillRequest) -> Result<VendorBillDraft, Error> {
    let due_on = parse_date(&body.due_on, FieldName::new("dueOn"))?;
    VendorBillDraft::new(&body.vendor_name, body.amount_cents, &body.currency, due_on).map_err(
        |err| match &err {
            VendorBillValidationError::Money(money) => money_error(money),
            _ => invalid_value_error(FieldName::new("vendorName"), &err),
        },
    )
}

/// List the organization's vendor bills by due date.
#[utoipa::path(
    get,
    path = "/api/v1/finance/vendor-bills",
    params(
        ("organizationId" = String, Query, format = Uuid, description = "Organization to read"),
        ("userId" = Option<String>, Query, format = Uuid, description = "Must equal the session user"),
        ("status" = Option<String>, Query, description = "unpaid or paid")
    ),
    responses(
        (status = 200, description = "Vendor bills (enveloped)", body = [VendorBillSchema]),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Finance role required", body = ErrorEnvelopeSchema)
    ),
    tags = ["finance"],
    operation_id = "listVendorBills",
    security(("SessionCookie" = []))
)]
#[get("/finance/vendor-bills")]
pub async fn list_vendor_bills(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<VendorBillListQuery>,
) -> ApiResponse<Vec<VendorBill>> {
    let caller = query.scope.caller(&session)?;
    let status = parse_optional_status::<VendorBillStatus>(
        query.status.as_deref(),
        FieldName::new("status"),
    )?;
    let bills = state.vendor_bills_query.list(&caller, status).await?;
    Ok(ok(bills))
}

/// Record a new unpaid vendor bill.
#[utoipa::path(
    post,
    path = "/api/v1/finance/vendor-bills",
    request_body = CreateVendorBillRequest,
    params(
        ("organizationId" = String, Query, format = Uuid, description = "Organization to bill"),
        ("userId" = Option<String>, Query, format = Uuid, description = "Must equal the session user")
    ),
    responses(
        (status = 201, description = "Vendor bill recorded (enveloped)", body = VendorBillSchema),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Finance role required", body = ErrorEnvelopeSchema)
    ),
    tags = ["finance"],
    operation_id = "createVendorBill",
    security(("SessionCookie" = []))
)]
#[post("/finance/vendor-bills")]
pub async fn create_vendor_bill(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<OrganizationScope>,
    payload: web::Json<CreateVendorBillRequest>,
) -> ApiResult<HttpResponse> {
    let caller = query.caller(&session)?;
    let draft = parse_bill(payload.into_inner())?;
    let bill = state.vendor_bills.create(&caller, draft).await?;
    Ok(created(bill))
}

/// Pay an unpaid vendor bill (`unpaid → paid`).
#[utoipa::path(
    post,
    path = "/api/v1/finance/vendor-bills/{id}/pay",
    params(
        ("id" = i32, Path, description = "Vendor bill identifier"),
        ("organizationId" = String, Query, format = Uuid, description = "Organization owning the bill"),
        ("userId" = Option<String>, Query, format = Uuid, description = "Must equal the session user")
    ),
    responses(
        (status = 200, description = "Vendor bill paid (enveloped)", body = VendorBillSchema),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Finance role required", body = ErrorEnvelopeSchema),
        (status = 409, description = "Bill missing or already paid", body = ErrorEnvelopeSchema)
    ),
    tags = ["finance"],
    operation_id = "payVendorBill",
    security(("SessionCookie" = []))
)]
#[post("/finance/vendor-bills/{id}/pay")]
pub async fn pay_vendor_bill(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<OrganizationScope>,
) -> ApiResponse<VendorBill> {
    let caller = query.caller(&session)?;
    let bill_id = parse_record_id(&path, ID, VendorBillId::parse)?;
    let bill = state.vendor_bills.mark_paid(&caller, bill_id).await?;
    Ok(ok(bill))
}
