//! HTTP inbound adapter exposing REST endpoints.
//!
//! Every `/api/v1` route answers with the `{"success", "data" | "error"}`
//! envelope; see [`envelope`].

pub mod auth;
pub mod envelope;
pub mod error;
pub mod expenses;
pub mod health;
pub mod invitations;
pub mod notifications;
pub mod projects;
pub mod schemas;
pub mod scope;
pub mod session;
pub mod session_config;
pub mod state;
pub mod stats;
#[cfg(test)]
pub mod test_utils;
pub mod validation;
pub mod vendor_bills;

use actix_web::web;

pub use error::ApiResult;

/// Register extractor error handlers and every `/api/v1` handler.
///
/// The caller mounts this under the `/api/v1` scope and wraps it with the
/// session middleware.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(error::json_config())
        .app_data(error::query_config())
        .app_data(error::path_config())
        .service(auth::login)
        .service(auth::logout)
        .service(expenses::list_expenses)
        .service(expenses::submit_expense)
        .service(expenses::get_expense)
        .service(expenses::approve_expense)
        .service(expenses::reject_expense)
        .service(expenses::pay_expense)
        .service(expenses::reassign_expense_project)
        .service(vendor_bills::list_vendor_bills)
        .service(vendor_bills::create_vendor_bill)
        .service(vendor_bills::pay_vendor_bill)
        .service(invitations::list_invitations)
        .service(invitations::create_invitation)
        .service(invitations::accept_invitation)
        .service(notifications::list_notifications)
        .service(notifications::unread_count)
        .service(notifications::mark_all_read)
        .service(notifications::mark_read)
        .service(projects::list_projects)
        .service(projects::create_project)
        .service(projects::list_tasks)
        .service(projects::create_task)
        .service(projects::update_task_status)
        .service(stats::organization_stats)
        .service(stats::user_stats);
}
