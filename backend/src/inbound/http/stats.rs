//! Aggregate statistics handlers.
//!
//! Organizations and users without records get zeroed aggregates rather
//! than `not_found`.

use actix_web::{get, web};

use crate::domain::{OrganizationStats, UserId, UserStats};
use crate::inbound::http::envelope::{ApiResponse, ok};
use crate::inbound::http::schemas::{ErrorEnvelopeSchema, OrganizationStatsSchema, UserStatsSchema};
use crate::inbound::http::scope::{OrganizationScope, caller_for_path};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{ID, parse_uuid};

/// Organization-wide counts and money totals.
#[utoipa::path(
    get,
    path = "/api/v1/organizations/{id}/stats",
    params(("id" = String, Path, format = Uuid, description = "Organization identifier")),
    responses(
        (status = 200, description = "Organization statistics (enveloped)", body = OrganizationStatsSchema),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Admin, manager or finance role required", body = ErrorEnvelopeSchema)
    ),
    tags = ["stats"],
    operation_id = "organizationStats",
    security(("SessionCookie" = []))
)]
#[get("/organizations/{id}/stats")]
pub async fn organization_stats(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResponse<OrganizationStats> {
    let caller = caller_for_path(&session, &path)?;
    let stats = state.stats.organization_stats(&caller).await?;
    Ok(ok(stats))
}

/// Per-user statistics within one organization.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/stats",
    params(
        ("id" = String, Path, format = Uuid, description = "User whose statistics to read"),
        ("organizationId" = String, Query, format = Uuid, description = "Organization to aggregate over")
    ),
    responses(
        (status = 200, description = "User statistics (enveloped)", body = UserStatsSchema),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Another user's stats without permission", body = ErrorEnvelopeSchema)
    ),
    tags = ["stats"],
    operation_id = "userStats",
    security(("SessionCookie" = []))
)]
#[get("/users/{id}/stats")]
pub async fn user_stats(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<OrganizationScope>,
) -> ApiResponse<UserStats> {
    let caller = query.caller(&session)?;
    let user_id = UserId::from_uuid(parse_uuid(&path, ID)?);
    let stats = state.stats.user_stats(&caller, &user_id).await?;
    Ok(ok(stats))
}
