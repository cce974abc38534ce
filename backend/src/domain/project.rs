//! Projects and their tasks.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{OrganizationId, ParseStatusError, ProjectId, TaskId, UserId};

/// Project lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    Archived,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "archived" => Ok(Self::Archived),
            other => Err(ParseStatusError(other.to_owned())),
        }
    }
}

/// Task progress state. Any state may move to any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    /// `completed_at` value a task should carry after moving to `self`.
    pub fn completed_at(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        (self == Self::Done).then_some(now)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(Self::Todo),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            other => Err(ParseStatusError(other.to_owned())),
        }
    }
}

pub const PROJECT_NAME_MAX: usize = 120;
pub const TASK_TITLE_MAX: usize = 200;

/// Validation errors for project and task inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
}

fn bounded_text(
    value: &str,
    field: &'static str,
    max: usize,
) -> Result<String, ProjectValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ProjectValidationError::Empty { field });
    }
    if trimmed.chars().count() > max {
        return Err(ProjectValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

/// Validated input for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    pub name: String,
    pub description: Option<String>,
}

impl ProjectDraft {
    pub fn new(name: &str, description: Option<&str>) -> Result<Self, ProjectValidationError> {
        Ok(Self {
            name: bounded_text(name, "name", PROJECT_NAME_MAX)?,
            description: description
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(str::to_owned),
        })
    }
}

/// Validated input for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub assignee_id: Option<UserId>,
}

impl TaskDraft {
    pub fn new(title: &str, assignee_id: Option<UserId>) -> Result<Self, ProjectValidationError> {
        Ok(Self {
            title: bounded_text(title, "title", TASK_TITLE_MAX)?,
            assignee_id,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub organization_id: OrganizationId,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub project_id: ProjectId,
    pub title: String,
    pub status: TaskStatus,
    pub assignee_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}
