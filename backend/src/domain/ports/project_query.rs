//! Driving port for project and task reads.

use async_trait::async_trait;

use crate::domain::{Caller, Error, Project, ProjectId, Task};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectQuery: Send + Sync {
    async fn list_projects(&self, caller: &Caller) -> Result<Vec<Project>, Error>;

    async fn list_tasks(&self, caller: &Caller, project_id: ProjectId)
    -> Result<Vec<Task>, Error>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProjectQuery;

#[async_trait]
impl ProjectQuery for FixtureProjectQuery {
    async fn list_projects(&self, _caller: &Caller) -> Result<Vec<Project>, Error> {
        Ok(Vec::new())
    }

    async fn list_tasks(
        &self,
        _caller: &Caller,
        project_id: ProjectId,
    ) -> Result<Vec<Task>, Error> {
        Err(Error::not_found(format!("project {project_id} not found")))
    }
}
