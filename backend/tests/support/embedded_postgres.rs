//! Migrated scratch databases and row seeding for repository suites.
//!
//! Each test gets its own cluster and a temporary database with the
//! application's migrations applied through
//! [`opsdesk::outbound::persistence::run_pending_migrations`]. Seed rows are
//! written with the synchronous `postgres` client so they bypass the
//! adapters under test.

use opsdesk::domain::{OrganizationId, Role, UserId};
use opsdesk::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use pg_embedded_setup_unpriv::{TemporaryDatabase, TestCluster};
use postgres::{Client, NoTls};
use tokio::runtime::Runtime;
use uuid::Uuid;

use super::format_postgres_error;
use super::pg_embed::test_cluster;

/// Live database plus the runtime its pool was built on.
///
/// Fields drop in declaration order: the pool goes before the runtime that
/// drives it, and the database before its cluster.
pub struct PgContext {
    pub pool: DbPool,
    pub runtime: Runtime,
    database: TemporaryDatabase,
    _cluster: TestCluster,
}

impl PgContext {
    pub fn url(&self) -> &str {
        self.database.url()
    }

    /// Open a seeding client on the scratch database.
    pub fn seed(&self) -> Result<Seed, String> {
        let client =
            Client::connect(self.url(), NoTls).map_err(|err| format_postgres_error(&err))?;
        Ok(Seed { client })
    }
}

/// Start a cluster, create a scratch database, migrate it and open a pool.
pub fn setup_context() -> Result<PgContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = test_cluster()?;
    let name = format!("opsdesk_test_{}", Uuid::new_v4().simple());
    let database = cluster
        .temporary_database(name.as_str())
        .map_err(|err| format!("create database: {err:?}"))?;
    let url = database.url().to_owned();

    runtime
        .block_on(run_pending_migrations(url.clone()))
        .map_err(|err| err.to_string())?;
    let pool = runtime
        .block_on(DbPool::new(
            PoolConfig::new(url).with_max_size(2).with_min_idle(Some(1)),
        ))
        .map_err(|err| err.to_string())?;

    Ok(PgContext {
        pool,
        runtime,
        database,
        _cluster: cluster,
    })
}

/// Direct SQL access for arranging rows.
pub struct Seed {
    client: Client,
}

impl Seed {
    pub fn organization(&mut self) -> Result<OrganizationId, String> {
        let id = Uuid::new_v4();
        self.client
            .execute(
                "INSERT INTO organizations (id, name) VALUES ($1, $2)",
                &[&id, &"Seeded Org"],
            )
            .map_err(|err| format_postgres_error(&err))?;
        Ok(OrganizationId::from_uuid(id))
    }

    /// Insert a user whose digest never verifies.
    pub fn user(&mut self, email: &str) -> Result<UserId, String> {
        let id = Uuid::new_v4();
        self.client
            .execute(
                "INSERT INTO users (id, email, display_name, password_digest) \
                 VALUES ($1, $2, $3, $4)",
                &[&id, &email, &"Seeded User", &"!"],
            )
            .map_err(|err| format_postgres_error(&err))?;
        Ok(UserId::from_uuid(id))
    }

    pub fn membership(
        &mut self,
        organization_id: &OrganizationId,
        user_id: &UserId,
        role: Role,
    ) -> Result<(), String> {
        self.client
            .execute(
                "INSERT INTO memberships (organization_id, user_id, role) VALUES ($1, $2, $3)",
                &[organization_id.as_uuid(), user_id.as_uuid(), &role.as_str()],
            )
            .map_err(|err| format_postgres_error(&err))?;
        Ok(())
    }

    /// Insert an expense row directly, bypassing domain validation.
    pub fn raw_expense(
        &mut self,
        organization_id: &OrganizationId,
        submitted_by: &UserId,
        amount_cents: i64,
    ) -> Result<u64, postgres::Error> {
        self.client.execute(
            "INSERT INTO expenses \
             (organization_id, submitted_by, description, amount_cents, currency, incurred_on) \
             VALUES ($1, $2, 'seeded', $3, 'USD', CURRENT_DATE)",
            &[organization_id.as_uuid(), submitted_by.as_uuid(), &amount_cents],
        )
    }

    pub fn expense_status(&mut self, expense_id: i32) -> Result<String, String> {
        let row = self
            .client
            .query_one("SELECT status FROM expenses WHERE id = $1", &[&expense_id])
            .map_err(|err| format_postgres_error(&err))?;
        Ok(row.get(0))
    }

    pub fn membership_count(&mut self, organization_id: &OrganizationId) -> Result<i64, String> {
        let row = self
            .client
            .query_one(
                "SELECT COUNT(*) FROM memberships WHERE organization_id = $1",
                &[organization_id.as_uuid()],
            )
            .map_err(|err| format_postgres_error(&err))?;
        Ok(row.get(0))
    }
}
