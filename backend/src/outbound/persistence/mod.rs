//! PostgreSQL persistence adapters using Diesel.
//!
//! Each `Diesel*Repository` implements one driven port from
//! [`crate::domain::ports`] on top of a shared [`DbPool`]. Row structs and
//! the table schema stay private to this module; adapters convert rows into
//! validated domain types and map every failure onto the port's error enum.
//!
//! # Example
//!
//! ```no_run
//! use opsdesk::outbound::persistence::{DbPool, DieselExpenseRepository, PoolConfig};
//!
//! # async fn build() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/opsdesk")).await?;
//! let expenses = DieselExpenseRepository::new(pool);
//! # let _ = expenses;
//! # Ok(())
//! # }
//! ```

mod diesel_basic_error_mapping;
mod diesel_expense_repository;
mod diesel_invitation_repository;
mod diesel_notification_repository;
mod diesel_organization_repository;
mod diesel_project_repository;
mod diesel_stats_repository;
mod diesel_user_repository;
mod diesel_vendor_bill_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_expense_repository::DieselExpenseRepository;
pub use diesel_invitation_repository::DieselInvitationRepository;
pub use diesel_notification_repository::DieselNotificationRepository;
pub use diesel_organization_repository::DieselOrganizationRepository;
pub use diesel_project_repository::DieselProjectRepository;
pub use diesel_stats_repository::DieselStatsRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use diesel_vendor_bill_repository::DieselVendorBillRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
