//! Driving port for project and task mutations.

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    Caller, Error, Project, ProjectDraft, ProjectId, ProjectStatus, Task, TaskDraft, TaskId,
    TaskStatus,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectCommand: Send + Sync {
    async fn create_project(&self, caller: &Caller, draft: ProjectDraft)
    -> Result<Project, Error>;

    /// Add a task to a project of the caller's organization. An assignee must
    /// be a member of that organization.
    async fn create_task(
        &self,
        caller: &Caller,
        project_id: ProjectId,
        draft: TaskDraft,
    ) -> Result<Task, Error>;

    /// Move a task to any status. Assignees may update their own tasks
    /// without the task management role.
    async fn update_task_status(
        &self,
        caller: &Caller,
        task_id: TaskId,
        status: TaskStatus,
    ) -> Result<Task, Error>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProjectCommand;

#[async_trait]
impl ProjectCommand for FixtureProjectCommand {
    async fn create_project(
        &self,
        caller: &Caller,
        draft: ProjectDraft,
    ) -> Result<Project, Error> {
        let id = ProjectId::new(1)
            .map_err(|err| Error::internal(format!("invalid fixture project id: {err}")))?;
        Ok(Project {
            id,
            organization_id: caller.organization_id,
            name: draft.name,
            description: draft.description,
            status: ProjectStatus::Active,
            created_by: caller.user_id.clone(),
            created_at: Utc::now(),
        })
    }

    async fn create_task(
        &self,
        _caller: &Caller,
        project_id: ProjectId,
        _draft: TaskDraft,
    ) -> Result<Task, Error> {
        Err(Error::not_found(format!("project {project_id} not found")))
    }

    async fn update_task_status(
        &self,
        _caller: &Caller,
        task_id: TaskId,
        _status: TaskStatus,
    ) -> Result<Task, Error> {
        Err(Error::not_found(format!("task {task_id} not found")))
    }
}
