//! The create/edit form and its translation into request bodies.

use chrono::{DateTime, Utc};
use shared::dto;
use shared::validation::{validate_description, validate_title};
use shared::{CreateTaskRequest, Task, TaskPriority, TaskStatus, UpdateTaskRequest, ValidationError};
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskForm {
    pub open: bool,
    /// Set while editing an existing task, `None` while creating one.
    pub editing: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    /// As produced by `<input type="date">`, empty when unset.
    pub due_date: String,
    pub error: Option<String>,
}

impl TaskForm {
    pub fn blank() -> Self {
        Self {
            open: true,
            ..Self::default()
        }
    }

    pub fn from_task(task: &Task) -> Self {
        Self {
            open: true,
            editing: Some(task.id),
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            status: task.status,
            priority: task.priority,
            due_date: task
                .due_date
                .map(|due| due.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            error: None,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Checks the text fields locally so obvious mistakes never reach the
    /// server. The server validates again either way.
    fn check(&self) -> Result<(String, Option<String>), ValidationError> {
        Ok((
            validate_title(&self.title)?,
            validate_description(&self.description)?,
        ))
    }

    pub fn to_create_request(&self) -> Result<CreateTaskRequest, ValidationError> {
        let (title, description) = self.check()?;
        Ok(CreateTaskRequest {
            title,
            description,
            status: Some(self.status),
            priority: Some(self.priority),
            due_date: parse_due_date(&self.due_date),
        })
    }

    /// Sends every field, so clearing description or due date in the form
    /// clears it on the server too.
    pub fn to_update_request(&self) -> Result<UpdateTaskRequest, ValidationError> {
        let (title, description) = self.check()?;
        Ok(UpdateTaskRequest {
            title: Some(Some(title)),
            description: Some(description),
            status: Some(Some(self.status)),
            priority: Some(Some(self.priority)),
            due_date: Some(parse_due_date(&self.due_date)),
        })
    }
}

/// Midnight UTC of the picked day. Anything the date input should never
/// produce counts as no due date.
pub fn parse_due_date(raw: &str) -> Option<DateTime<Utc>> {
    dto::parse_due_date(raw).ok().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use shared::NewTask;

    #[rstest]
    #[case("2025-03-01", Some(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()))]
    #[case(" 2024-12-31 ", Some(Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap()))]
    #[case("", None)]
    #[case("31/12/2024", None)]
    #[case("2025-03-01T09:00:00Z", Some(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()))]
    #[case("2024-02-30", None)]
    fn due_dates(#[case] raw: &str, #[case] expected: Option<DateTime<Utc>>) {
        assert_eq!(parse_due_date(raw), expected);
    }

    #[test]
    fn create_request_from_blank_form() {
        let mut form = TaskForm::blank();
        assert_eq!(form.to_create_request(), Err(ValidationError::TitleRequired));

        form.title = "  Write report ".to_string();
        form.description = "   ".to_string();
        form.priority = TaskPriority::High;
        assert_eq!(
            form.to_create_request(),
            Ok(CreateTaskRequest {
                title: "Write report".to_string(),
                description: None,
                status: Some(TaskStatus::Todo),
                priority: Some(TaskPriority::High),
                due_date: None,
            })
        );
    }

    #[test]
    fn long_titles_are_caught_before_sending() {
        let form = TaskForm {
            title: "x".repeat(201),
            ..TaskForm::blank()
        };
        assert_eq!(form.to_create_request(), Err(ValidationError::TitleTooLong));
    }

    #[test]
    fn edit_round_trips_through_the_form() {
        let due = Utc.with_ymd_and_hms(2025, 6, 15, 0, 0, 0).unwrap();
        let task = Task::new(
            NewTask {
                title: "Ship".to_string(),
                description: Some("v2".to_string()),
                status: TaskStatus::InProgress,
                priority: TaskPriority::Low,
                due_date: Some(due),
            },
            Utc::now(),
        );

        let form = TaskForm::from_task(&task);
        assert!(form.is_editing());
        assert_eq!(form.due_date, "2025-06-15");
        assert_eq!(
            form.to_update_request(),
            Ok(UpdateTaskRequest {
                title: Some(Some("Ship".to_string())),
                description: Some(Some("v2".to_string())),
                status: Some(Some(TaskStatus::InProgress)),
                priority: Some(Some(TaskPriority::Low)),
                due_date: Some(Some(due)),
            })
        );
    }

    #[test]
    fn clearing_fields_in_the_form_clears_them_on_update() {
        let form = TaskForm {
            editing: Some(Uuid::nil()),
            title: "Keep".to_string(),
            ..TaskForm::blank()
        };
        let request = form.to_update_request().unwrap();
        assert_eq!(request.description, Some(None));
        assert_eq!(request.due_date, Some(None));
    }
}
