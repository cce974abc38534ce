//! Session login and logout handlers.
//!
//! ```text
//! POST /api/v1/login {"email":"admin@example.com","password":"password"}
//! POST /api/v1/logout
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{Error, LoginCredentials, LoginValidationError, UserId};
use crate::inbound::http::envelope::{ApiResponse, ok};
use crate::inbound::http::schemas::ErrorEnvelopeSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "admin@example.com")]
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Identity established by a successful login.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[schema(value_type = String, format = "uuid")]
    pub user_id: UserId,
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::InvalidEmail => Error::invalid_request("email must be a valid address")
            .with_details(json!({ "field": "email", "code": "invalid_email" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

/// Authenticate a user and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema),
        (status = 401, description = "Invalid credentials", body = ErrorEnvelopeSchema),
        (status = 503, description = "Service unavailable", body = ErrorEnvelopeSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResponse<LoginResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let user_id = state.login.authenticate(&credentials).await?;
    session.persist_user(&user_id)?;
    Ok(ok(LoginResponse { user_id }))
}

/// Clear the session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 200, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> ApiResponse<()> {
    session.clear();
    Ok(ok(()))
}
