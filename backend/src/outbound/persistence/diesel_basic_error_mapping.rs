//! Shared Diesel error mapping used by every repository adapter.
//!
//! Adapters pass their port error constructors in; the helpers decide which
//! failures count as connection problems and which as query failures.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map a pool failure onto a repository's connection constructor.
pub fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map a Diesel failure onto query/connection constructors.
///
/// Database messages are logged at `debug` and replaced by fixed strings so
/// constraint names and values never reach API responses.
pub fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            query("duplicate record")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            query("referenced record missing")
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
            query("record violates a check constraint")
        }
        DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, _) => {
            query("concurrent update conflict")
        }
        DieselError::DeserializationError(_) => query("unreadable database row"),
        _ => query("database error"),
    }
}
