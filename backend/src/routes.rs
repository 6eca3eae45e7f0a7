use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::{
    create_task, delete_task, get_task, health, list_tasks, task_stats, update_task,
    update_task_status,
};
use crate::AppState;

/// The `/api` surface.
///
/// `/api/tasks/stats` is registered ahead of `/api/tasks/:id`; the literal
/// segment must never be read as an id.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/tasks/stats", get(task_stats))
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route(
            "/api/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/api/tasks/:id/status", patch(update_task_status))
}
