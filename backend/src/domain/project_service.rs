//! Project and task domain service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::access::{authorize, map_organization_error};
use crate::domain::ports::{
    OrganizationRepository, ProjectCommand, ProjectQuery, ProjectRepository,
    ProjectRepositoryError,
};
use crate::domain::{
    Action, Caller, Error, Project, ProjectDraft, ProjectId, Task, TaskDraft, TaskId, TaskStatus,
};

/// Project service implementing [`ProjectCommand`] and [`ProjectQuery`].
#[derive(Clone)]
pub struct ProjectService<R, O> {
    projects: Arc<R>,
    organizations: Arc<O>,
    clock: Arc<dyn Clock>,
}

impl<R, O> ProjectService<R, O> {
    pub fn new(projects: Arc<R>, organizations: Arc<O>, clock: Arc<dyn Clock>) -> Self {
        Self {
            projects,
            organizations,
            clock,
        }
    }
}

fn map_project_error(error: ProjectRepositoryError) -> Error {
    match error {
        ProjectRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("project repository unavailable: {message}"))
        }
        ProjectRepositoryError::Query { message } => {
            Error::internal(format!("project repository error: {message}"))
        }
    }
}

fn project_not_found(project_id: ProjectId) -> Error {
    Error::not_found(format!("project {project_id} not found"))
}

fn task_not_found(task_id: TaskId) -> Error {
    Error::not_found(format!("task {task_id} not found"))
}

impl<R, O> ProjectService<R, O>
where
    R: ProjectRepository,
    O: OrganizationRepository,
{
    async fn ensure_project(&self, caller: &Caller, project_id: ProjectId) -> Result<(), Error> {
        let owned = self
            .organizations
            .owns_project(&caller.organization_id, project_id)
            .await
            .map_err(map_organization_error)?;
        if owned {
            Ok(())
        } else {
            Err(project_not_found(project_id))
        }
    }

    async fn ensure_assignee_is_member(
        &self,
        caller: &Caller,
        draft: &TaskDraft,
    ) -> Result<(), Error> {
        let Some(assignee) = draft.assignee_id.as_ref() else {
            return Ok(());
        };
        let role = self
            .organizations
            .find_role(&caller.organization_id, assignee)
            .await
            .map_err(map_organization_error)?;
        if role.is_some() {
            return Ok(());
        }
        Err(
            Error::invalid_request("assignee must be a member of the organization").with_details(
                json!({
                    "field": "assigneeId",
                    "value": assignee.as_ref(),
                    "code": "not_a_member",
                }),
            ),
        )
    }
}

#[async_trait]
impl<R, O> ProjectCommand for ProjectService<R, O>
where
    R: ProjectRepository,
    O: OrganizationRepository,
{
    async fn create_project(&self, caller: &Caller, draft: ProjectDraft) -> Result<Project, Error> {
        authorize(self.organizations.as_ref(), caller, Action::CreateProject).await?;
        let project = self
            .projects
            .insert_project(&caller.organization_id, &caller.user_id, &draft)
            .await
            .map_err(map_project_error)?;
        info!(
            project_id = %project.id,
            organization_id = %caller.organization_id,
            "project created"
        );
        Ok(project)
    }

    async fn create_task(
        &self,
        caller: &Caller,
        project_id: ProjectId,
        draft: TaskDraft,
    ) -> Result<Task, Error> {
        authorize(self.organizations.as_ref(), caller, Action::ManageTasks).await?;
        self.ensure_project(caller, project_id).await?;
        self.ensure_assignee_is_member(caller, &draft).await?;
        self.projects
            .insert_task(project_id, &draft)
            .await
            .map_err(map_project_error)
    }

    async fn update_task_status(
        &self,
        caller: &Caller,
        task_id: TaskId,
        status: TaskStatus,
    ) -> Result<Task, Error> {
        let role = authorize(self.organizations.as_ref(), caller, Action::ReadRecords).await?;
        let task = self
            .projects
            .find_task(&caller.organization_id, task_id)
            .await
            .map_err(map_project_error)?
            .ok_or_else(|| task_not_found(task_id))?;

        let is_assignee = task.assignee_id.as_ref() == Some(&caller.user_id);
        if !is_assignee && !role.permits(Action::ManageTasks) {
            return Err(Error::forbidden(format!(
                "role {role} may not {}",
                Action::ManageTasks.describe()
            )));
        }

        let updated = self
            .projects
            .update_task_status(task_id, status, status.completed_at(self.clock.utc()))
            .await
            .map_err(map_project_error)?
            .ok_or_else(|| task_not_found(task_id))?;
        info!(
            task_id = %task_id,
            from = %task.status,
            to = %status,
            actor = %caller.user_id,
            "task status changed"
        );
        Ok(updated)
    }
}

#[async_trait]
impl<R, O> ProjectQuery for ProjectService<R, O>
where
    R: ProjectRepository,
    O: OrganizationRepository,
{
    async fn list_projects(&self, caller: &Caller) -> Result<Vec<Project>, Error> {
        authorize(self.organizations.as_ref(), caller, Action::ReadRecords).await?;
        self.projects
            .list_projects(&caller.organization_id)
            .await
            .map_err(map_project_error)
    }

    async fn list_tasks(&self, caller: &Caller, project_id: ProjectId) -> Result<Vec<Task>, Error> {
        authorize(self.organizations.as_ref(), caller, Action::ReadRecords).await?;
        self.ensure_project(caller, project_id).await?;
        self.projects
            .list_tasks(project_id)
            .await
            .map_err(map_project_error)
    }
}

#[cfg(test)]
#[path = "project_service_tests.rs"]
mod tests;
