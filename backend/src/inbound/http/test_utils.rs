//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test as actix_test, web};
use serde_json::Value;

use crate::domain::UserId;
use crate::domain::ports::{FIXTURE_LOGIN_EMAIL, FIXTURE_LOGIN_PASSWORD, FIXTURE_LOGIN_USER_ID};

use super::configure_api;
use super::state::HttpState;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Full `/api/v1` router over `state`, with a test session middleware.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .service(web::scope("/api/v1").configure(configure_api))
}

/// User id the fixture login service authenticates.
pub fn fixture_user_id() -> UserId {
    UserId::new(FIXTURE_LOGIN_USER_ID).expect("fixture user id is valid")
}

/// Extract the `session` cookie set on a response.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

/// Log in with the fixture credentials and return the session cookie.
pub async fn login_and_get_cookie(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
) -> Cookie<'static> {
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(serde_json::json!({
            "email": FIXTURE_LOGIN_EMAIL,
            "password": FIXTURE_LOGIN_PASSWORD,
        }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success(), "fixture login succeeds");
    session_cookie(&response)
}

/// Read a response body as JSON, asserting the envelope shape.
pub async fn read_data(response: ServiceResponse) -> Value {
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.get("success"), Some(&Value::Bool(true)), "body: {body}");
    body.get("data").cloned().unwrap_or(Value::Null)
}

/// Read an error envelope and return its `error.code`.
pub async fn read_error_code(response: ServiceResponse) -> String {
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.get("success"), Some(&Value::Bool(false)), "body: {body}");
    body.pointer("/error/code")
        .and_then(Value::as_str)
        .expect("error code")
        .to_owned()
}
