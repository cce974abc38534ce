//! PostgreSQL-backed `StatsRepository` computing aggregates on read.
//!
//! Every report runs its SELECTs inside one read-only `REPEATABLE READ`
//! transaction so the counts come from a single snapshot. Money sums are
//! clamped to `BIGINT` range. Missing groups stay at zero.

use async_trait::async_trait;
use diesel::dsl::{count_star, now};
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Text, Uuid as SqlUuid};
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{StatsRepository, StatsRepositoryError};
use crate::domain::{
    AmountTally, AssignedTaskCounts, InvitationStatus, OrganizationId, OrganizationStats, ProjectCounts,
    ProjectStatus, StatusBreakdown, TaskCounts, TaskStatus, UserId, UserStats,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::pool::{DbPool, PoolError};
use super::schema::{invitations, memberships, notifications, projects, tasks};

const ORGANIZATION_EXPENSE_TALLY_SQL: &str = "\
SELECT status, COUNT(*)::BIGINT AS count, LEAST(COALESCE(SUM(amount_cents), 0), 9223372036854775807)::BIGINT AS total_cents \
FROM expenses WHERE organization_id = $1 GROUP BY status";

const USER_EXPENSE_TALLY_SQL: &str = "\
SELECT status, COUNT(*)::BIGINT AS count, LEAST(COALESCE(SUM(amount_cents), 0), 9223372036854775807)::BIGINT AS total_cents \
FROM expenses WHERE organization_id = $1 AND submitted_by = $2 GROUP BY status";

const VENDOR_BILL_TALLY_SQL: &str = "\
SELECT status, COUNT(*)::BIGINT AS count, LEAST(COALESCE(SUM(amount_cents), 0), 9223372036854775807)::BIGINT AS total_cents \
FROM vendor_bills WHERE organization_id = $1 GROUP BY status";

/// One `GROUP BY status` row of a money tally.
#[derive(Debug, Clone, QueryableByName)]
struct StatusTallyRow {
    #[diesel(sql_type = Text)]
    status: String,
    #[diesel(sql_type = BigInt)]
    count: i64,
    #[diesel(sql_type = BigInt)]
    total_cents: i64,
}

#[derive(Clone)]
pub struct DieselStatsRepository {
    pool: DbPool,
}

impl DieselStatsRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> StatsRepositoryError {
    map_basic_pool_error(error, |message| StatsRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> StatsRepositoryError {
    map_basic_diesel_error(
        error,
        StatsRepositoryError::query,
        StatsRepositoryError::connection,
    )
}

fn breakdown_from(mut breakdown: StatusBreakdown, rows: Vec<StatusTallyRow>) -> StatusBreakdown {
    for row in rows {
        breakdown.record(
            &row.status,
            AmountTally {
                count: row.count,
                total_cents: row.total_cents,
            },
        );
    }
    breakdown
}

fn project_counts(rows: Vec<(String, i64)>) -> ProjectCounts {
    rows.into_iter()
        .fold(ProjectCounts::default(), |mut counts, (status, count)| {
            match status.parse::<ProjectStatus>() {
                Ok(ProjectStatus::Active) => counts.active += count,
                Ok(ProjectStatus::Archived) => counts.archived += count,
                Err(_) => {}
            }
            counts
        })
}

fn task_counts(rows: Vec<(String, i64)>) -> TaskCounts {
    rows.into_iter()
        .fold(TaskCounts::default(), |mut counts, (status, count)| {
            match status.parse::<TaskStatus>() {
                Ok(TaskStatus::Todo) => counts.todo += count,
                Ok(TaskStatus::InProgress) => counts.in_progress += count,
                Ok(TaskStatus::Done) => counts.done += count,
                Err(_) => {}
            }
            counts
        })
}

fn assigned_task_counts(tasks: TaskCounts) -> AssignedTaskCounts {
    AssignedTaskCounts {
        open: tasks.todo + tasks.in_progress,
        done: tasks.done,
    }
}

#[async_trait]
impl StatsRepository for DieselStatsRepository {
    async fn organization_stats(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<OrganizationStats, StatsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let org: Uuid = *organization_id.as_uuid();

        let (members, project_rows, task_rows, expense_rows, bill_rows, pending) = conn
            .build_transaction()
            .repeatable_read()
            .read_only()
            .run(|conn| {
                async move {
                    let members: i64 = memberships::table
                        .filter(memberships::organization_id.eq(org))
                        .count()
                        .get_result(conn)
                        .await?;
                    let project_rows: Vec<(String, i64)> = projects::table
                        .filter(projects::organization_id.eq(org))
                        .group_by(projects::status)
                        .select((projects::status, count_star()))
                        .load(conn)
                        .await?;
                    let task_rows: Vec<(String, i64)> = tasks::table
                        .inner_join(projects::table)
                        .filter(projects::organization_id.eq(org))
                        .group_by(tasks::status)
                        .select((tasks::status, count_star()))
                        .load(conn)
                        .await?;
                    let expense_rows: Vec<StatusTallyRow> =
                        sql_query(ORGANIZATION_EXPENSE_TALLY_SQL)
                            .bind::<SqlUuid, _>(org)
                            .load(conn)
                            .await?;
                    let bill_rows: Vec<StatusTallyRow> = sql_query(VENDOR_BILL_TALLY_SQL)
                        .bind::<SqlUuid, _>(org)
                        .load(conn)
                        .await?;
                    let pending: i64 = invitations::table
                        .filter(invitations::organization_id.eq(org))
                        .filter(invitations::status.eq(InvitationStatus::Pending.as_str()))
                        .filter(invitations::expires_at.gt(now))
                        .count()
                        .get_result(conn)
                        .await?;
                    Ok::<_, diesel::result::Error>((
                        members,
                        project_rows,
                        task_rows,
                        expense_rows,
                        bill_rows,
                        pending,
                    ))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        let expenses_by_status = breakdown_from(StatusBreakdown::for_expenses(), expense_rows);
        let vendor_bills_by_status =
            breakdown_from(StatusBreakdown::for_vendor_bills(), bill_rows);
        Ok(OrganizationStats {
            member_count: members,
            projects: project_counts(project_rows),
            tasks: task_counts(task_rows),
            expenses: expenses_by_status.total(),
            expenses_by_status,
            vendor_bills: vendor_bills_by_status.total(),
            vendor_bills_by_status,
            pending_invitations: pending,
            ..OrganizationStats::zeroed(*organization_id)
        })
    }

    async fn user_stats(
        &self,
        organization_id: &OrganizationId,
        user_id: &UserId,
    ) -> Result<UserStats, StatsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let org: Uuid = *organization_id.as_uuid();
        let user: Uuid = *user_id.as_uuid();

        let (expense_rows, task_rows, unread) = conn
            .build_transaction()
            .repeatable_read()
            .read_only()
            .run(|conn| {
                async move {
                    let expense_rows: Vec<StatusTallyRow> = sql_query(USER_EXPENSE_TALLY_SQL)
                        .bind::<SqlUuid, _>(org)
                        .bind::<SqlUuid, _>(user)
                        .load(conn)
                        .await?;
                    let task_rows: Vec<(String, i64)> = tasks::table
                        .inner_join(projects::table)
                        .filter(projects::organization_id.eq(org))
                        .filter(tasks::assignee_id.eq(user))
                        .group_by(tasks::status)
                        .select((tasks::status, count_star()))
                        .load(conn)
                        .await?;
                    let unread: i64 = notifications::table
                        .filter(notifications::user_id.eq(user))
                        .filter(notifications::read_at.is_null())
                        .count()
                        .get_result(conn)
                        .await?;
                    Ok::<_, diesel::result::Error>((expense_rows, task_rows, unread))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        let expenses_by_status = breakdown_from(StatusBreakdown::for_expenses(), expense_rows);
        Ok(UserStats {
            expenses_submitted: expenses_by_status.total(),
            expenses_by_status,
            tasks_assigned: assigned_task_counts(task_counts(task_rows)),
            unread_notifications: unread,
            ..UserStats::zeroed(user_id.clone(), *organization_id)
        })
    }
}
