//! Invitation HTTP handlers.
//!
//! ```text
//! GET  /api/v1/organizations/{id}/invitations
//! POST /api/v1/organizations/{id}/invitations {"email":"..","role":"finance"}
//! POST /api/v1/invitations/{id}/accept
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{EmailAddress, Error, Invitation, InvitationId, Role};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{ApiResponse, created, ok};
use crate::inbound::http::schemas::{ErrorEnvelopeSchema, InvitationSchema};
use crate::inbound::http::scope::caller_for_path;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, ID, invalid_value_error, parse_uuid};

/// Request body for creating an invitation.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvitationRequest {
    #[schema(format = "email", example = "new.hire@example.com")]
    pub email: String,
    /// One of `admin`, `manager`, `project_manager`, `finance`, `member`.
    #[schema(example = "member")]
    pub role: String,
}

fn parse_invitation(body: &CreateInvitationRequest) -> Result<(EmailAddress, Role), Error> {
    let email =
        EmailAddress::new(&body.email).map_err(|err| invalid_value_error(FieldName::new("email"), err))?;
    let role = body
        .role
        .trim()
        .parse::<Role>()
        .map_err(|err| invalid_value_error(FieldName::new("role"), err))?;
    Ok((email, role))
}

/// Pending, unexpired invitations of an organization.
#[utoipa::path(
    get,
    path = "/api/v1/organizations/{id}/invitations",
    params(("id" = String, Path, format = Uuid, description = "Organization identifier")),
    responses(
        (status = 200, description = "Pending invitations (enveloped)", body = [InvitationSchema]),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Admin or manager role required", body = ErrorEnvelopeSchema)
    ),
    tags = ["invitations"],
    operation_id = "listInvitations",
    security(("SessionCookie" = []))
)]
#[get("/organizations/{id}/invitations")]
pub async fn list_invitations(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResponse<Vec<Invitation>> {
    let caller = caller_for_path(&session, &path)?;
    let invitations = state.invitations_query.list_pending(&caller).await?;
    Ok(ok(invitations))
}

/// Invite an e-mail address into the organization.
#[utoipa::path(
    post,
    path = "/api/v1/organizations/{id}/invitations",
    request_body = CreateInvitationRequest,
    params(("id" = String, Path, format = Uuid, description = "Organization identifier")),
    responses(
        (status = 201, description = "Invitation created (enveloped)", body = InvitationSchema),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Admin or manager role required", body = ErrorEnvelopeSchema)
    ),
    tags = ["invitations"],
    operation_id = "createInvitation",
    security(("SessionCookie" = []))
)]
#[post("/organizations/{id}/invitations")]
pub async fn create_invitation(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CreateInvitationRequest>,
) -> ApiResult<HttpResponse> {
    let caller = caller_for_path(&session, &path)?;
    let (email, role) = parse_invitation(&payload)?;
    let invitation = state.invitations.invite(&caller, email, role).await?;
    Ok(created(invitation))
}

/// Accept an invitation addressed to the signed-in user's e-mail.
#[utoipa::path(
    post,
    path = "/api/v1/invitations/{id}/accept",
    params(("id" = String, Path, format = Uuid, description = "Invitation identifier")),
    responses(
        (status = 200, description = "Invitation accepted (enveloped)", body = InvitationSchema),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Invitation addressed to another e-mail", body = ErrorEnvelopeSchema),
        (status = 409, description = "Missing, expired or already accepted", body = ErrorEnvelopeSchema)
    ),
    tags = ["invitations"],
    operation_id = "acceptInvitation",
    security(("SessionCookie" = []))
)]
#[post("/invitations/{id}/accept")]
pub async fn accept_invitation(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResponse<Invitation> {
    let user_id = session.require_user_id()?;
    let invitation_id = InvitationId::from_uuid(parse_uuid(&path, ID)?);
    let invitation = state.invitations.accept(&user_id, &invitation_id).await?;
    Ok(ok(invitation))
}
