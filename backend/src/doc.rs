//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api/v1` handler and the health probes, the
//! schema wrappers from [`crate::inbound::http::schemas`], and the session
//! cookie security scheme. The document backs Swagger UI in debug builds and
//! is printed by the `openapi-dump` binary.

use crate::inbound::http::auth::{LoginRequest, LoginResponse};
use crate::inbound::http::expenses::{
    ReassignProjectRequest, RejectExpenseRequest, SubmitExpenseRequest,
};
use crate::inbound::http::invitations::CreateInvitationRequest;
use crate::inbound::http::notifications::{MarkedRead, UnreadCount};
use crate::inbound::http::projects::{
    CreateProjectRequest, CreateTaskRequest, UpdateTaskStatusRequest,
};
use crate::inbound::http::schemas::{
    AmountTallySchema, ErrorCodeSchema, ErrorEnvelopeSchema, ErrorSchema, ExpenseSchema,
    InvitationSchema, NotificationSchema, OrganizationStatsSchema, ProjectSchema, TaskSchema,
    UserStatsSchema, VendorBillSchema,
};
use crate::inbound::http::vendor_bills::CreateVendorBillRequest;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "opsdesk API",
        description = "Expense approvals, vendor bills, invitations, notifications, projects and statistics for organizations."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::expenses::list_expenses,
        crate::inbound::http::expenses::submit_expense,
        crate::inbound::http::expenses::get_expense,
        crate::inbound::http::expenses::approve_expense,
        crate::inbound::http::expenses::reject_expense,
        crate::inbound::http::expenses::pay_expense,
        crate::inbound::http::expenses::reassign_expense_project,
        crate::inbound::http::vendor_bills::list_vendor_bills,
        crate::inbound::http::vendor_bills::create_vendor_bill,
        crate::inbound::http::vendor_bills::pay_vendor_bill,
        crate::inbound::http::invitations::list_invitations,
        crate::inbound::http::invitations::create_invitation,
        crate::inbound::http::invitations::accept_invitation,
        crate::inbound::http::notifications::list_notifications,
        crate::inbound::http::notifications::unread_count,
        crate::inbound::http::notifications::mark_read,
        crate::inbound::http::notifications::mark_all_read,
        crate::inbound::http::projects::list_projects,
        crate::inbound::http::projects::create_project,
        crate::inbound::http::projects::list_tasks,
        crate::inbound::http::projects::create_task,
        crate::inbound::http::projects::update_task_status,
        crate::inbound::http::stats::organization_stats,
        crate::inbound::http::stats::user_stats,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        ErrorEnvelopeSchema,
        ExpenseSchema,
        VendorBillSchema,
        InvitationSchema,
        NotificationSchema,
        ProjectSchema,
        TaskSchema,
        AmountTallySchema,
        OrganizationStatsSchema,
        UserStatsSchema,
        LoginRequest,
        LoginResponse,
        SubmitExpenseRequest,
        RejectExpenseRequest,
        ReassignProjectRequest,
        CreateVendorBillRequest,
        CreateInvitationRequest,
        CreateProjectRequest,
        CreateTaskRequest,
        UpdateTaskStatusRequest,
        UnreadCount,
        MarkedRead,
    )),
    tags(
        (name = "auth", description = "Session login and logout"),
        (name = "expenses", description = "Expense submission and approval workflow"),
        (name = "finance", description = "Vendor bills and finance-only expense edits"),
        (name = "invitations", description = "Organization invitations"),
        (name = "notifications", description = "In-app notifications for the signed-in user"),
        (name = "projects", description = "Projects and tasks"),
        (name = "stats", description = "Aggregate statistics"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
