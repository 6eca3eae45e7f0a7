//! Field rules a task must satisfy before it is written.

use thiserror::Error;

use crate::dto::{CreateTaskRequest, UpdateTaskRequest};
use crate::task::{NewTask, TaskPatch};

pub const TITLE_MAX_CHARS: usize = 200;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Task title is required")]
    TitleRequired,
    #[error("Title cannot exceed 200 characters")]
    TitleTooLong,
    #[error("Description cannot exceed 1000 characters")]
    DescriptionTooLong,
    #[error("`{0}` is not a valid status (todo, in-progress, done)")]
    InvalidStatus(String),
    #[error("`{0}` is not a valid priority (low, medium, high)")]
    InvalidPriority(String),
}

/// Trims a title and checks it is present and within bounds.
pub fn validate_title(raw: &str) -> Result<String, ValidationError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(ValidationError::TitleRequired);
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(ValidationError::TitleTooLong);
    }
    Ok(title.to_string())
}

/// Trims a description. Blank text is stored as no description.
pub fn validate_description(raw: &str) -> Result<Option<String>, ValidationError> {
    let description = raw.trim();
    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(ValidationError::DescriptionTooLong);
    }
    Ok((!description.is_empty()).then(|| description.to_string()))
}

impl CreateTaskRequest {
    pub fn validate(self) -> Result<NewTask, ValidationError> {
        let title = validate_title(&self.title)?;
        let description = match self.description.as_deref() {
            Some(raw) => validate_description(raw)?,
            None => None,
        };
        Ok(NewTask {
            title,
            description,
            status: self.status.unwrap_or_default(),
            priority: self.priority.unwrap_or_default(),
            due_date: self.due_date,
        })
    }
}

impl UpdateTaskRequest {
    pub fn validate(self) -> Result<TaskPatch, ValidationError> {
        let title = match self.title {
            Some(Some(raw)) => Some(validate_title(&raw)?),
            Some(None) => return Err(ValidationError::TitleRequired),
            None => None,
        };
        let description = match self.description {
            Some(Some(raw)) => Some(validate_description(&raw)?),
            Some(None) => Some(None),
            None => None,
        };
        // status and priority cannot be cleared, only replaced
        let status = match self.status {
            Some(None) => return Err(ValidationError::InvalidStatus("null".to_string())),
            other => other.flatten(),
        };
        let priority = match self.priority {
            Some(None) => return Err(ValidationError::InvalidPriority("null".to_string())),
            other => other.flatten(),
        };
        Ok(TaskPatch {
            title,
            description,
            status,
            priority,
            due_date: self.due_date,
        })
    }
}
