//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration. Every success body is wrapped
//! in `{"success": true, "data": ...}`; the schemas below describe `data`.
#![expect(
    dead_code,
    reason = "Schema wrappers are only read by utoipa derive output"
)]

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    #[schema(rename = "unauthorized")]
    Unauthorized,
    #[schema(rename = "forbidden")]
    Forbidden,
    #[schema(rename = "not_found")]
    NotFound,
    /// A workflow precondition did not hold.
    #[schema(rename = "conflict")]
    Conflict,
    /// The database could not be reached.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
pub struct ErrorSchema {
    #[schema(example = "conflict")]
    code: ErrorCodeSchema,
    #[schema(example = "expense 42 cannot be approved: it is missing or not submitted")]
    message: String,
    /// Correlation identifier, mirrored in the `trace-id` response header.
    #[schema(format = "uuid")]
    trace_id: Option<String>,
    details: Option<serde_json::Value>,
}

/// Failure envelope returned by every `/api/v1` route.
#[derive(ToSchema)]
#[schema(as = ErrorEnvelope)]
pub struct ErrorEnvelopeSchema {
    /// Always `false`.
    success: bool,
    error: ErrorSchema,
}

/// OpenAPI schema for [`crate::domain::Expense`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Expense, rename_all = "camelCase")]
pub struct ExpenseSchema {
    #[schema(example = 42)]
    id: i32,
    #[schema(format = "uuid")]
    organization_id: String,
    #[schema(format = "uuid")]
    submitted_by: String,
    project_id: Option<i32>,
    description: String,
    #[schema(example = 1250)]
    amount_cents: i64,
    #[schema(example = "EUR")]
    currency: String,
    #[schema(format = "date")]
    incurred_on: String,
    #[schema(example = "submitted")]
    status: String,
    #[schema(format = "uuid")]
    approved_by: Option<String>,
    #[schema(format = "date-time")]
    approved_at: Option<String>,
    #[schema(format = "uuid")]
    paid_by: Option<String>,
    #[schema(format = "date-time")]
    paid_at: Option<String>,
    #[schema(format = "uuid")]
    rejected_by: Option<String>,
    #[schema(format = "date-time")]
    rejected_at: Option<String>,
    rejection_reason: Option<String>,
    #[schema(format = "date-time")]
    created_at: String,
    #[schema(format = "date-time")]
    updated_at: String,
}

/// OpenAPI schema for [`crate::domain::VendorBill`].
#[derive(ToSchema)]
#[schema(as = crate::domain::VendorBill, rename_all = "camelCase")]
pub struct VendorBillSchema {
    id: i32,
    #[schema(format = "uuid")]
    organization_id: String,
    vendor_name: String,
    amount_cents: i64,
    currency: String,
    #[schema(format = "date")]
    due_on: String,
    #[schema(example = "unpaid")]
    status: String,
    #[schema(format = "date-time")]
    paid_at: Option<String>,
    #[schema(format = "date-time")]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::Invitation`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Invitation, rename_all = "camelCase")]
pub struct InvitationSchema {
    #[schema(format = "uuid")]
    id: String,
    #[schema(format = "uuid")]
    organization_id: String,
    #[schema(format = "email")]
    email: String,
    #[schema(example = "member")]
    role: String,
    #[schema(format = "uuid")]
    invited_by: String,
    #[schema(example = "pending")]
    status: String,
    #[schema(format = "uuid")]
    accepted_by: Option<String>,
    #[schema(format = "date-time")]
    accepted_at: Option<String>,
    #[schema(format = "date-time")]
    expires_at: String,
    #[schema(format = "date-time")]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::Notification`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Notification, rename_all = "camelCase")]
pub struct NotificationSchema {
    #[schema(format = "uuid")]
    id: String,
    #[schema(format = "uuid")]
    user_id: String,
    #[schema(format = "uuid")]
    organization_id: Option<String>,
    #[schema(example = "expense_approved")]
    kind: String,
    message: String,
    #[schema(format = "date-time")]
    read_at: Option<String>,
    #[schema(format = "date-time")]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::Project`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Project, rename_all = "camelCase")]
pub struct ProjectSchema {
    id: i32,
    #[schema(format = "uuid")]
    organization_id: String,
    name: String,
    description: Option<String>,
    #[schema(example = "active")]
    status: String,
    #[schema(format = "uuid")]
    created_by: String,
    #[schema(format = "date-time")]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::Task`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Task, rename_all = "camelCase")]
pub struct TaskSchema {
    id: i32,
    project_id: i32,
    title: String,
    #[schema(example = "in_progress")]
    status: String,
    #[schema(format = "uuid")]
    assignee_id: Option<String>,
    #[schema(format = "date-time")]
    created_at: String,
    #[schema(format = "date-time")]
    completed_at: Option<String>,
}

/// OpenAPI schema for [`crate::domain::AmountTally`].
#[derive(ToSchema)]
#[schema(as = crate::domain::AmountTally, rename_all = "camelCase")]
pub struct AmountTallySchema {
    count: i64,
    total_cents: i64,
}

/// OpenAPI schema for [`crate::domain::OrganizationStats`].
#[derive(ToSchema)]
#[schema(as = crate::domain::OrganizationStats, rename_all = "camelCase")]
pub struct OrganizationStatsSchema {
    #[schema(format = "uuid")]
    organization_id: String,
    member_count: i64,
    /// `{"active": n, "archived": n}`.
    projects: serde_json::Value,
    /// `{"todo": n, "inProgress": n, "done": n}`.
    tasks: serde_json::Value,
    expenses: AmountTallySchema,
    /// Tally per expense status; every status is present.
    expenses_by_status: std::collections::BTreeMap<String, AmountTallySchema>,
    vendor_bills: AmountTallySchema,
    vendor_bills_by_status: std::collections::BTreeMap<String, AmountTallySchema>,
    pending_invitations: i64,
}

/// OpenAPI schema for [`crate::domain::UserStats`].
#[derive(ToSchema)]
#[schema(as = crate::domain::UserStats, rename_all = "camelCase")]
pub struct UserStatsSchema {
    #[schema(format = "uuid")]
    user_id: String,
    #[schema(format = "uuid")]
    organization_id: String,
    expenses_submitted: AmountTallySchema,
    expenses_by_status: std::collections::BTreeMap<String, AmountTallySchema>,
    /// `{"open": n, "done": n}`.
    tasks_assigned: serde_json::Value,
    unread_notifications: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    #[test]
    fn error_code_schema_lists_conflict_and_unavailable() {
        let json = serde_json::to_value(ErrorCodeSchema::schema()).expect("schema serialises");
        let variants = json
            .get("enum")
            .and_then(serde_json::Value::as_array)
            .expect("enum variants");
        assert!(variants.contains(&serde_json::json!("conflict")));
        assert!(variants.contains(&serde_json::json!("service_unavailable")));
    }

    #[test]
    fn expense_schema_uses_camel_case() {
        let json = serde_json::to_value(ExpenseSchema::schema()).expect("schema serialises");
        let properties = json.get("properties").expect("properties");
        assert!(properties.get("amountCents").is_some());
        assert!(properties.get("amount_cents").is_none());
    }
}
