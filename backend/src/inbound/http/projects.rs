//! Project and task HTTP handlers.
//!
//! ```text
//! GET   /api/v1/organizations/{id}/projects
//! POST  /api/v1/organizations/{id}/projects
//! GET   /api/v1/organizations/{id}/projects/{projectId}/tasks
//! POST  /api/v1/organizations/{id}/projects/{projectId}/tasks
//! PATCH /api/v1/organizations/{id}/tasks/{taskId} {"status":"done"}
//! ```

use actix_web::{HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Error, Project, ProjectDraft, ProjectId, ProjectValidationError, Task, TaskDraft, TaskId,
    TaskStatus, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{ApiResponse, created, ok};
use crate::inbound::http::schemas::{ErrorEnvelopeSchema, ProjectSchema, TaskSchema};
use crate::inbound::http::scope::caller_for_path;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, parse_record_id, parse_uuid,
};

const PROJECT_ID: FieldName = FieldName::new("projectId");
const TASK_ID: FieldName = FieldName::new("taskId");
const STATUS: FieldName = FieldName::new("status");

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    #[schema(example = "Office move")]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[schema(example = "Book movers")]
    pub title: String,
    #[schema(format = "uuid")]
    pub assignee_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskStatusRequest {
    /// `todo`, `in_progress` or `done`.
    #[schema(example = "in_progress")]
    pub status: String,
}

fn map_project_validation_error(err: &ProjectValidationError) -> Error {
    let field = match err {
        ProjectValidationError::Empty { field } | ProjectValidationError::TooLong { field, .. } => {
            *field
        }
    };
    invalid_value_error(FieldName::new(field), err)
}

fn parse_task_draft(body: &CreateTaskRequest) -> Result<TaskDraft, Error> {
    let assignee = body
        .assignee_id
        .as_deref()
        .map(|raw| parse_uuid(raw, FieldName::new("assigneeId")).map(UserId::from_uuid))
        .transpose()?;
    TaskDraft::new(&body.title, assignee).map_err(|err| map_project_validation_error(&err))
}

/// Projects of an organization.
#[utoipa::path(
    get,
    path = "/api/v1/organizations/{id}/projects",
    params(("id" = String, Path, format = Uuid, description = "Organization identifier")),
    responses(
        (status = 200, description = "Projects (enveloped)", body = [ProjectSchema]),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Not a member", body = ErrorEnvelopeSchema)
    ),
    tags = ["projects"],
    operation_id = "listProjects",
    security(("SessionCookie" = []))
)]
#[get("/organizations/{id}/projects")]
pub async fn list_projects(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResponse<Vec<Project>> {
    let caller = caller_for_path(&session, &path)?;
    let projects = state.projects_query.list_projects(&caller).await?;
    Ok(ok(projects))
}

/// Create a project.
#[utoipa::path(
    post,
    path = "/api/v1/organizations/{id}/projects",
    request_body = CreateProjectRequest,
    params(("id" = String, Path, format = Uuid, description = "Organization identifier")),
    responses(
        (status = 201, description = "Project created (enveloped)", body = ProjectSchema),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Project management role required", body = ErrorEnvelopeSchema)
    ),
    tags = ["projects"],
    operation_id = "createProject",
    security(("SessionCookie" = []))
)]
#[post("/organizations/{id}/projects")]
pub async fn create_project(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CreateProjectRequest>,
) -> ApiResult<HttpResponse> {
    let caller = caller_for_path(&session, &path)?;
    let draft = ProjectDraft::new(&payload.name, payload.description.as_deref())
        .map_err(|err| map_project_validation_error(&err))?;
    let project = state.projects.create_project(&caller, draft).await?;
    Ok(created(project))
}

/// Tasks of one project.
#[utoipa::path(
    get,
    path = "/api/v1/organizations/{id}/projects/{projectId}/tasks",
    params(
        ("id" = String, Path, format = Uuid, description = "Organization identifier"),
        ("projectId" = i32, Path, description = "Project identifier")
    ),
    responses(
        (status = 200, description = "Tasks (enveloped)", body = [TaskSchema]),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Not a member", body = ErrorEnvelopeSchema),
        (status = 404, description = "Project not found", body = ErrorEnvelopeSchema)
    ),
    tags = ["projects"],
    operation_id = "listTasks",
    security(("SessionCookie" = []))
)]
#[get("/organizations/{id}/projects/{project_id}/tasks")]
pub async fn list_tasks(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResponse<Vec<Task>> {
    let (organization, project) = path.into_inner();
    let caller = caller_for_path(&session, &organization)?;
    let project_id = parse_record_id(&project, PROJECT_ID, ProjectId::parse)?;
    let tasks = state.projects_query.list_tasks(&caller, project_id).await?;
    Ok(ok(tasks))
}

/// Add a task to a project.
#[utoipa::path(
    post,
    path = "/api/v1/organizations/{id}/projects/{projectId}/tasks",
    request_body = CreateTaskRequest,
    params(
        ("id" = String, Path, format = Uuid, description = "Organization identifier"),
        ("projectId" = i32, Path, description = "Project identifier")
    ),
    responses(
        (status = 201, description = "Task created (enveloped)", body = TaskSchema),
        (status = 400, description = "Invalid request or assignee not a member", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Project management role required", body = ErrorEnvelopeSchema),
        (status = 404, description = "Project not found", body = ErrorEnvelopeSchema)
    ),
    tags = ["projects"],
    operation_id = "createTask",
    security(("SessionCookie" = []))
)]
#[post("/organizations/{id}/projects/{project_id}/tasks")]
pub async fn create_task(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
    payload: web::Json<CreateTaskRequest>,
) -> ApiResult<HttpResponse> {
    let (organization, project) = path.into_inner();
    let caller = caller_for_path(&session, &organization)?;
    let project_id = parse_record_id(&project, PROJECT_ID, ProjectId::parse)?;
    let draft = parse_task_draft(&payload)?;
    let task = state.projects.create_task(&caller, project_id, draft).await?;
    Ok(created(task))
}

/// Move a task to another status.
#[utoipa::path(
    patch,
    path = "/api/v1/organizations/{id}/tasks/{taskId}",
    request_body = UpdateTaskStatusRequest,
    params(
        ("id" = String, Path, format = Uuid, description = "Organization identifier"),
        ("taskId" = i32, Path, description = "Task identifier")
    ),
    responses(
        (status = 200, description = "Task updated (enveloped)", body = TaskSchema),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Neither assignee nor project manager", body = ErrorEnvelopeSchema),
        (status = 404, description = "Task not found", body = ErrorEnvelopeSchema)
    ),
    tags = ["projects"],
    operation_id = "updateTaskStatus",
    security(("SessionCookie" = []))
)]
#[patch("/organizations/{id}/tasks/{task_id}")]
pub async fn update_task_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
    payload: web::Json<UpdateTaskStatusRequest>,
) -> ApiResponse<Task> {
    let (organization, task) = path.into_inner();
    let caller = caller_for_path(&session, &organization)?;
    let task_id = parse_record_id(&task, TASK_ID, TaskId::parse)?;
    let status = payload
        .status
        .trim()
        .parse::<TaskStatus>()
        .map_err(|err| invalid_value_error(STATUS, err))?;
    let task = state
        .projects
        .update_task_status(&caller, task_id, status)
        .await?;
    Ok(ok(task))
}
