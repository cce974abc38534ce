//! Port for project and task persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    OrganizationId, Project, ProjectDraft, ProjectId, Task, TaskDraft, TaskId, TaskStatus, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by project repository adapters.
    pub enum ProjectRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "project repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "project repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn insert_project(
        &self,
        organization_id: &OrganizationId,
        created_by: &UserId,
        draft: &ProjectDraft,
    ) -> Result<Project, ProjectRepositoryError>;

    async fn list_projects(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<Vec<Project>, ProjectRepositoryError>;

    async fn insert_task(
        &self,
        project_id: ProjectId,
        draft: &TaskDraft,
    ) -> Result<Task, ProjectRepositoryError>;

    async fn list_tasks(&self, project_id: ProjectId) -> Result<Vec<Task>, ProjectRepositoryError>;

    /// Fetch a task whose project belongs to `organization_id`.
    async fn find_task(
        &self,
        organization_id: &OrganizationId,
        task_id: TaskId,
    ) -> Result<Option<Task>, ProjectRepositoryError>;

    async fn update_task_status(
        &self,
        task_id: TaskId,
        status: TaskStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<Option<Task>, ProjectRepositoryError>;
}
