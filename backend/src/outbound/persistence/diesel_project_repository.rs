//! PostgreSQL-backed `ProjectRepository` implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ProjectRepository, ProjectRepositoryError};
use crate::domain::{
    OrganizationId, Project, ProjectDraft, ProjectId, ProjectStatus, Task, TaskDraft, TaskId,
    TaskStatus, UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewProjectRow, NewTaskRow, ProjectRow, TaskRow};
use super::pool::{DbPool, PoolError};
use super::schema::{projects, tasks};

#[derive(Clone)]
pub struct DieselProjectRepository {
    pool: DbPool,
}

impl DieselProjectRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ProjectRepositoryError {
    map_basic_pool_error(error, |message| ProjectRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> ProjectRepositoryError {
    map_basic_diesel_error(
        error,
        ProjectRepositoryError::query,
        ProjectRepositoryError::connection,
    )
}

fn corrupt(field: &str, err: impl std::fmt::Display) -> ProjectRepositoryError {
    ProjectRepositoryError::query(format!("stored {field}: {err}"))
}

fn row_to_project(row: ProjectRow) -> Result<Project, ProjectRepositoryError> {
    Ok(Project {
        id: ProjectId::new(row.id).map_err(|err| corrupt("project id", err))?,
        organization_id: OrganizationId::from_uuid(row.organization_id),
        name: row.name,
        description: row.description,
        status: row
            .status
            .parse::<ProjectStatus>()
            .map_err(|err| corrupt("project status", err))?,
        created_by: UserId::from_uuid(row.created_by),
        created_at: row.created_at,
    })
}

fn row_to_task(row: TaskRow) -> Result<Task, ProjectRepositoryError> {
    Ok(Task {
        id: TaskId::new(row.id).map_err(|err| corrupt("task id", err))?,
        project_id: ProjectId::new(row.project_id).map_err(|err| corrupt("project id", err))?,
        title: row.title,
        status: row
            .status
            .parse::<TaskStatus>()
            .map_err(|err| corrupt("task status", err))?,
        assignee_id: row.assignee_id.map(UserId::from_uuid),
        created_at: row.created_at,
        completed_at: row.completed_at,
    })
}

#[async_trait]
impl ProjectRepository for DieselProjectRepository {
    async fn insert_project(
        &self,
        organization_id: &OrganizationId,
        created_by: &UserId,
        draft: &ProjectDraft,
    ) -> Result<Project, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewProjectRow {
            organization_id: *organization_id.as_uuid(),
            name: draft.name.as_str(),
            description: draft.description.as_deref(),
            created_by: *created_by.as_uuid(),
        };

        let stored = diesel::insert_into(projects::table)
            .values(&row)
            .returning(ProjectRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_project(stored)
    }

    async fn list_projects(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<Vec<Project>, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ProjectRow> = projects::table
            .filter(projects::organization_id.eq(organization_id.as_uuid()))
            .order(projects::created_at.desc())
            .select(ProjectRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_project).collect()
    }

    async fn insert_task(
        &self,
        project_id: ProjectId,
        draft: &TaskDraft,
    ) -> Result<Task, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewTaskRow {
            project_id: project_id.get(),
            title: draft.title.as_str(),
            assignee_id: draft.assignee_id.as_ref().map(|id| *id.as_uuid()),
        };

        let stored = diesel::insert_into(tasks::table)
            .values(&row)
            .returning(TaskRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_task(stored)
    }

    async fn list_tasks(&self, project_id: ProjectId) -> Result<Vec<Task>, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<TaskRow> = tasks::table
            .filter(tasks::project_id.eq(project_id.get()))
            .order((tasks::created_at.asc(), tasks::id.asc()))
            .select(TaskRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_task).collect()
    }

    async fn find_task(
        &self,
        organization_id: &OrganizationId,
        task_id: TaskId,
    ) -> Result<Option<Task>, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = tasks::table
            .inner_join(projects::table)
            .filter(tasks::id.eq(task_id.get()))
            .filter(projects::organization_id.eq(organization_id.as_uuid()))
            .select(TaskRow::as_select())
            .first::<TaskRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_task).transpose()
    }

    async fn update_task_status(
        &self,
        task_id: TaskId,
        status: TaskStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<Option<Task>, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::update(tasks::table.filter(tasks::id.eq(task_id.get())))
            .set((
                tasks::status.eq(status.as_str()),
                tasks::completed_at.eq(completed_at),
            ))
            .returning(TaskRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_task).transpose()
    }
}
