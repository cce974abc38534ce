//! Notification HTTP handlers.
//!
//! Notifications belong to the signed-in user and are not scoped to an
//! organization.
//!
//! ```text
//! GET  /api/v1/notifications?unreadOnly=true&limit=20
//! GET  /api/v1/notifications/unread-count
//! POST /api/v1/notifications/{id}/read
//! POST /api/v1/notifications/read-all
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Notification, NotificationId, NotificationLimit};
use crate::inbound::http::envelope::{ApiResponse, ok};
use crate::inbound::http::schemas::{ErrorEnvelopeSchema, NotificationSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, ID, ensure_session_user, invalid_value_error, parse_uuid,
};

/// `?userId=...` accepted for compatibility with older clients.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationListQuery {
    pub user_id: Option<String>,
    #[serde(default)]
    pub unread_only: bool,
    pub limit: Option<i64>,
}

/// Unread notification count.
#[derive(Debug, Serialize, ToSchema)]
pub struct UnreadCount {
    #[schema(example = 3)]
    pub count: i64,
}

/// Number of notifications changed by a bulk update.
#[derive(Debug, Serialize, ToSchema)]
pub struct MarkedRead {
    pub updated: u64,
}

/// List the signed-in user's notifications, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    params(
        ("unreadOnly" = Option<bool>, Query, description = "Only unread notifications"),
        ("limit" = Option<i64>, Query, description = "Page size, 1 to 100 (default 50)"),
        ("userId" = Option<String>, Query, format = Uuid, description = "Must equal the session user")
    ),
    responses(
        (status = 200, description = "Notifications (enveloped)", body = [NotificationSchema]),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema)
    ),
    tags = ["notifications"],
    operation_id = "listNotifications",
    security(("SessionCookie" = []))
)]
#[get("/notifications")]
pub async fn list_notifications(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<NotificationListQuery>,
) -> ApiResponse<Vec<Notification>> {
    let user_id = session.require_user_id()?;
    ensure_session_user(query.user_id.as_deref(), &user_id)?;
    let limit = NotificationLimit::new(query.limit)
        .map_err(|err| invalid_value_error(FieldName::new("limit"), err))?;
    let notifications = state
        .notifications_query
        .list(&user_id, query.unread_only, limit)
        .await?;
    Ok(ok(notifications))
}

/// Count the signed-in user's unread notifications.
#[utoipa::path(
    get,
    path = "/api/v1/notifications/unread-count",
    params(
        ("userId" = Option<String>, Query, format = Uuid, description = "Must equal the session user")
    ),
    responses(
        (status = 200, description = "Unread count (enveloped)", body = UnreadCount),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "userId names another user", body = ErrorEnvelopeSchema)
    ),
    tags = ["notifications"],
    operation_id = "unreadNotificationCount",
    security(("SessionCookie" = []))
)]
#[get("/notifications/unread-count")]
pub async fn unread_count(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<UserQuery>,
) -> ApiResponse<UnreadCount> {
    let user_id = session.require_user_id()?;
    ensure_session_user(query.user_id.as_deref(), &user_id)?;
    let count = state.notifications_query.unread_count(&user_id).await?;
    Ok(ok(UnreadCount { count }))
}

/// Mark one notification read. Repeating the call succeeds.
#[utoipa::path(
    post,
    path = "/api/v1/notifications/{id}/read",
    params(("id" = String, Path, format = Uuid, description = "Notification identifier")),
    responses(
        (status = 200, description = "Marked read; data is null"),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 404, description = "Not found", body = ErrorEnvelopeSchema)
    ),
    tags = ["notifications"],
    operation_id = "markNotificationRead",
    security(("SessionCookie" = []))
)]
#[post("/notifications/{id}/read")]
pub async fn mark_read(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResponse<()> {
    let user_id = session.require_user_id()?;
    let notification_id = NotificationId::from_uuid(parse_uuid(&path, ID)?);
    state
        .notifications
        .mark_read(&user_id, &notification_id)
        .await?;
    Ok(ok(()))
}

/// Mark every notification of the signed-in user read.
#[utoipa::path(
    post,
    path = "/api/v1/notifications/read-all",
    responses(
        (status = 200, description = "Number marked read (enveloped)", body = MarkedRead),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema)
    ),
    tags = ["notifications"],
    operation_id = "markAllNotificationsRead",
    security(("SessionCookie" = []))
)]
#[post("/notifications/read-all")]
pub async fn mark_all_read(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResponse<MarkedRead> {
    let user_id = session.require_user_id()?;
    let updated = state.notifications.mark_all_read(&user_id).await?;
    Ok(ok(MarkedRead { updated }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;
    use crate::domain::ports::{MockNotificationCommand, MockNotificationQuery};
    use crate::inbound::http::test_utils::{
        fixture_user_id, login_and_get_cookie, read_data, read_error_code, test_app,
    };
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use chrono::Utc;
    use rstest::rstest;
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn get(uri: &str, cookie: actix_web::cookie::Cookie<'static>) -> actix_http::Request {
        actix_test::TestRequest::get()
            .uri(uri)
            .cookie(cookie)
            .to_request()
    }

    #[actix_web::test]
    async fn unread_count_is_zero_without_notifications() {
        let app = actix_test::init_service(test_app(HttpState::fixtures())).await;
        let cookie = login_and_get_cookie(&app).await;

        let response =
            actix_test::call_service(&app, get("/api/v1/notifications/unread-count", cookie))
                .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_data(response).await, json!({"count": 0}));
    }

    #[actix_web::test]
    async fn unread_count_reads_the_session_user() {
        let mut query = MockNotificationQuery::new();
        query
            .expect_unread_count()
            .withf(|user| *user == fixture_user_id())
            .times(1)
            .return_once(|_| Ok(4));
        let state = HttpState {
            notifications_query: Arc::new(query),
            ..HttpState::fixtures()
        };
        let app = actix_test::init_service(test_app(state)).await;
        let cookie = login_and_get_cookie(&app).await;
        let own = fixture_user_id();

        let response = actix_test::call_service(
            &app,
            get(&format!("/api/v1/notifications/unread-count?userId={own}"), cookie),
        )
        .await;

        assert_eq!(read_data(response).await["count"], json!(4));
    }

    #[actix_web::test]
    async fn unread_count_for_another_user_is_forbidden() {
        let app = actix_test::init_service(test_app(HttpState::fixtures())).await;
        let cookie = login_and_get_cookie(&app).await;
        let other = UserId::random();

        let response = actix_test::call_service(
            &app,
            get(&format!("/api/v1/notifications/unread-count?userId={other}"), cookie),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(read_error_code(response).await, "forbidden");
    }

    #[actix_web::test]
    async fn list_forwards_filter_and_limit() {
        let mut query = MockNotificationQuery::new();
        query
            .expect_list()
            .withf(|_, unread_only, limit| *unread_only && limit.get() == 20)
            .times(1)
            .return_once(|user, _, _| {
                Ok(vec![Notification::unread(
                    user.clone(),
                    None,
                    "expense_approved",
                    "Expense 4 was approved",
                    Utc::now(),
                )])
            });
        let state = HttpState {
            notifications_query: Arc::new(query),
            ..HttpState::fixtures()
        };
        let app = actix_test::init_service(test_app(state)).await;
        let cookie = login_and_get_cookie(&app).await;

        let response = actix_test::call_service(
            &app,
            get("/api/v1/notifications?unreadOnly=true&limit=20", cookie),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let data = read_data(response).await;
        assert_eq!(data[0]["kind"], json!("expense_approved"));
        assert_eq!(data[0]["readAt"], Value::Null);
    }

    #[rstest]
    #[case("0")]
    #[case("101")]
    #[actix_web::test]
    async fn list_rejects_out_of_range_limits(#[case] limit: &str) {
        let app = actix_test::init_service(test_app(HttpState::fixtures())).await;
        let cookie = login_and_get_cookie(&app).await;

        let response = actix_test::call_service(
            &app,
            get(&format!("/api/v1/notifications?limit={limit}"), cookie),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.pointer("/error/details/field"), Some(&json!("limit")));
    }

    #[actix_web::test]
    async fn mark_read_is_idempotent_at_the_edge() {
        let notification_id = NotificationId::random();
        let mut command = MockNotificationCommand::new();
        command
            .expect_mark_read()
            .withf(move |user, id| *user == fixture_user_id() && *id == notification_id)
            .times(2)
            .returning(|_, _| Ok(()));
        let state = HttpState {
            notifications: Arc::new(command),
            ..HttpState::fixtures()
        };
        let app = actix_test::init_service(test_app(state)).await;
        let cookie = login_and_get_cookie(&app).await;

        for _ in 0..2 {
            let response = actix_test::call_service(
                &app,
                actix_test::TestRequest::post()
                    .uri(&format!("/api/v1/notifications/{notification_id}/read"))
                    .cookie(cookie.clone())
                    .to_request(),
            )
            .await;
            assert_eq!(response.status(), StatusCode::OK);
        }
    }

    #[actix_web::test]
    async fn mark_all_read_reports_changed_rows() {
        let mut command = MockNotificationCommand::new();
        command
            .expect_mark_all_read()
            .times(1)
            .return_once(|_| Ok(7));
        let state = HttpState {
            notifications: Arc::new(command),
            ..HttpState::fixtures()
        };
        let app = actix_test::init_service(test_app(state)).await;
        let cookie = login_and_get_cookie(&app).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/notifications/read-all")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(read_data(response).await, json!({"updated": 7}));
    }
}
