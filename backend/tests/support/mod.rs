//! Shared helpers for the embedded PostgreSQL integration suites.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! the cluster bootstrap, database provisioning and row seeding live here
//! and each suite pulls them in with `mod support;`.

#![allow(
    dead_code,
    reason = "each integration crate uses a different subset of the helpers"
)]

pub mod cluster_skip;
pub mod embedded_postgres;
pub mod pg_embed;

pub use cluster_skip::handle_cluster_setup_failure;
pub use embedded_postgres::{PgContext, setup_context};

/// Render a `postgres` error with enough detail to be useful in CI logs.
///
/// The `Display` implementation collapses database errors to `db error`,
/// hiding the message and SQLSTATE.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };

    let mut summary = format!(
        "postgres error {:?}: {}",
        db_error.code(),
        db_error.message()
    );
    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    summary
}
