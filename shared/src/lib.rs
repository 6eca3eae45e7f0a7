//! Types shared by the task board server and its browser client.
//!
//! Everything here is pure data plus the field rules a task must satisfy
//! before it is stored. Both tiers serialize these types as the JSON wire
//! format of the `/api/tasks` surface.

pub mod dto;
pub mod query;
pub mod stats;
pub mod task;
pub mod validation;

pub use dto::{
    CreateTaskRequest, DeleteTaskResponse, ErrorResponse, HealthResponse, UpdateStatusRequest,
    UpdateTaskRequest,
};
pub use query::{SortField, SortOrder, TaskFilter, TaskQuery};
pub use stats::{PriorityCounts, StatusCounts, TaskStats};
pub use task::{NewTask, Task, TaskPatch, TaskPriority, TaskStatus};
pub use validation::{ValidationError, DESCRIPTION_MAX_CHARS, TITLE_MAX_CHARS};
