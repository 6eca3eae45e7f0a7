//! One handler per route of the task API.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use shared::{
    CreateTaskRequest, DeleteTaskResponse, HealthResponse, SortField, SortOrder, Task,
    TaskFilter, TaskPriority, TaskQuery, TaskStats, TaskStatus, UpdateStatusRequest,
    UpdateTaskRequest,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ApiError;
use crate::AppState;

/// Raw `GET /api/tasks` query string.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTasksParams {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

impl ListTasksParams {
    /// Resolves the raw parameters. Returns `None` when a filter names a
    /// value no task can hold, since such a query matches nothing.
    pub fn into_query(self) -> Option<TaskQuery> {
        let status = match non_empty(self.status) {
            Some(raw) => Some(raw.parse::<TaskStatus>().ok()?),
            None => None,
        };
        let priority = match non_empty(self.priority) {
            Some(raw) => Some(raw.parse::<TaskPriority>().ok()?),
            None => None,
        };
        let sort_by = match non_empty(self.sort_by) {
            Some(raw) => raw.parse::<SortField>().ok(),
            None => Some(SortField::default()),
        };
        let order = non_empty(self.order)
            .map(|raw| SortOrder::parse_lenient(&raw))
            .unwrap_or_default();

        Some(TaskQuery {
            filter: TaskFilter { status, priority },
            sort_by,
            order,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

// Ids that are not UUIDs cannot name a stored task.
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound)
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
    })
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Query(params): Query<ListTasksParams>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let Some(query) = params.into_query() else {
        return Ok(Json(Vec::new()));
    };
    let tasks = state
        .store
        .list(&query)
        .await
        .map_err(ApiError::storage("Error fetching tasks"))?;
    debug!(count = tasks.len(), ?query, "listed tasks");
    Ok(Json(tasks))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_id(&id)?;
    state
        .store
        .get(id)
        .await
        .map_err(ApiError::storage("Error fetching task"))?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

pub async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let Json(request) =
        payload.map_err(|rejection| ApiError::rejected("Error creating task", rejection))?;
    let task = Task::new(request.validate()?, Utc::now());

    state
        .store
        .insert(&task)
        .await
        .map_err(ApiError::storage("Error creating task"))?;

    info!(task_id = %task.id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let Json(request) =
        payload.map_err(|rejection| ApiError::rejected("Error updating task", rejection))?;
    let id = parse_id(&id)?;

    let mut task = state
        .store
        .get(id)
        .await
        .map_err(ApiError::storage("Error updating task"))?
        .ok_or(ApiError::NotFound)?;

    task.apply(request.validate()?, Utc::now());
    state
        .store
        .replace(&task)
        .await
        .map_err(ApiError::storage("Error updating task"))?;

    info!(task_id = %task.id, "task updated");
    Ok(Json(task))
}

pub async fn update_task_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        ApiError::rejected("Valid status is required (todo, in-progress, done)", rejection)
    })?;
    let id = parse_id(&id)?;

    let mut task = state
        .store
        .get(id)
        .await
        .map_err(ApiError::storage("Error updating task status"))?
        .ok_or(ApiError::NotFound)?;

    task.set_status(request.status, Utc::now());
    state
        .store
        .replace(&task)
        .await
        .map_err(ApiError::storage("Error updating task status"))?;

    info!(task_id = %task.id, status = %task.status, "task status changed");
    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteTaskResponse>, ApiError> {
    let id = parse_id(&id)?;
    state
        .store
        .remove(id)
        .await
        .map_err(ApiError::storage("Error deleting task"))?;

    info!(task_id = %id, "task deleted");
    Ok(Json(DeleteTaskResponse {
        message: "Task deleted successfully".to_string(),
        id,
    }))
}

pub async fn task_stats(State(state): State<AppState>) -> Result<Json<TaskStats>, ApiError> {
    state
        .store
        .stats()
        .await
        .map(Json)
        .map_err(ApiError::storage("Error fetching statistics"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn params(
        status: Option<&str>,
        priority: Option<&str>,
        sort_by: Option<&str>,
        order: Option<&str>,
    ) -> ListTasksParams {
        ListTasksParams {
            status: status.map(str::to_string),
            priority: priority.map(str::to_string),
            sort_by: sort_by.map(str::to_string),
            order: order.map(str::to_string),
        }
    }

    #[test]
    fn empty_params_mean_newest_first() {
        assert_eq!(
            ListTasksParams::default().into_query(),
            Some(TaskQuery::default())
        );
    }

    #[test]
    fn known_values_are_resolved() {
        let query = params(Some("in-progress"), Some("high"), Some("title"), Some("asc"))
            .into_query()
            .unwrap();
        assert_eq!(query.filter.status, Some(TaskStatus::InProgress));
        assert_eq!(query.filter.priority, Some(TaskPriority::High));
        assert_eq!(query.sort_by, Some(SortField::Title));
        assert_eq!(query.order, SortOrder::Asc);
    }

    #[rstest]
    #[case(params(Some("archived"), None, None, None))]
    #[case(params(None, Some("urgent"), None, None))]
    fn impossible_filters_match_nothing(#[case] raw: ListTasksParams) {
        assert_eq!(raw.into_query(), None);
    }

    #[test]
    fn blank_filters_are_ignored() {
        let query = params(Some(""), Some(""), None, None).into_query().unwrap();
        assert!(query.filter.is_empty());
    }

    #[test]
    fn unknown_sort_field_falls_back_to_natural_order() {
        let query = params(None, None, Some("colour"), Some("asc")).into_query().unwrap();
        assert_eq!(query.sort_by, None);
    }

    #[test]
    fn non_uuid_ids_are_not_found() {
        assert!(matches!(parse_id("stats-ish"), Err(ApiError::NotFound)));
        assert!(parse_id("00000000-0000-0000-0000-000000000000").is_ok());
    }
}
