//! Client-side task state.
//!
//! [`TaskState`] is an ordinary value owned by the application model and
//! handed to the view by reference. It changes only through
//! [`TaskState::apply`], which is fed the lifecycle of each request
//! (`Pending`, then `Fulfilled` or `Rejected`) plus the synchronous filter and
//! sort settings.
//!
//! Responses are applied in the order they arrive. Two overlapping fetches
//! can therefore leave the older result on screen if it lands last; nothing
//! cancels a superseded request.

use std::collections::HashMap;

use shared::{SortField, SortOrder, Task, TaskFilter, TaskQuery};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Fetch,
    Create,
    Update,
    UpdateStatus,
    Delete,
}

impl Operation {
    fn failure_text(self) -> &'static str {
        match self {
            Operation::Fetch => "Failed to fetch tasks",
            Operation::Create => "Failed to create task",
            Operation::Update => "Failed to update task",
            Operation::UpdateStatus => "Failed to update task status",
            Operation::Delete => "Failed to delete task",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestStatus {
    #[default]
    Idle,
    Pending,
    Fulfilled,
    Rejected,
}

/// A successful response, tagged with what it answers.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Fetched(Vec<Task>),
    Created(Task),
    Updated(Task),
    StatusUpdated(Task),
    Deleted(Uuid),
}

impl Outcome {
    pub fn operation(&self) -> Operation {
        match self {
            Outcome::Fetched(_) => Operation::Fetch,
            Outcome::Created(_) => Operation::Create,
            Outcome::Updated(_) => Operation::Update,
            Outcome::StatusUpdated(_) => Operation::UpdateStatus,
            Outcome::Deleted(_) => Operation::Delete,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Pending(Operation),
    Fulfilled(Outcome),
    Rejected(Operation, String),
    SetFilter(TaskFilter),
    SetSortBy(SortField),
    SetSortOrder(SortOrder),
    /// Filter off, newest first.
    ClearFilters,
    ClearError,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskState {
    tasks: Vec<Task>,
    loading: bool,
    error: Option<String>,
    filter: TaskFilter,
    sort_by: SortField,
    sort_order: SortOrder,
    requests: HashMap<Operation, RequestStatus>,
}

impl Default for TaskState {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            loading: false,
            error: None,
            filter: TaskFilter::default(),
            sort_by: SortField::CreatedAt,
            sort_order: SortOrder::Desc,
            requests: HashMap::new(),
        }
    }
}

impl TaskState {
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn filter(&self) -> TaskFilter {
        self.filter
    }

    pub fn sort_by(&self) -> SortField {
        self.sort_by
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn request_status(&self, operation: Operation) -> RequestStatus {
        self.requests.get(&operation).copied().unwrap_or_default()
    }

    /// The list request matching the current filter and sort settings.
    pub fn query(&self) -> TaskQuery {
        TaskQuery {
            filter: self.filter,
            sort_by: Some(self.sort_by),
            order: self.sort_order,
        }
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Pending(operation) => {
                self.requests.insert(operation, RequestStatus::Pending);
                self.error = None;
                if operation == Operation::Fetch {
                    self.loading = true;
                }
            }
            Action::Fulfilled(outcome) => {
                self.requests
                    .insert(outcome.operation(), RequestStatus::Fulfilled);
                self.fulfil(outcome);
            }
            Action::Rejected(operation, message) => {
                self.requests.insert(operation, RequestStatus::Rejected);
                if operation == Operation::Fetch {
                    self.loading = false;
                }
                self.error = Some(if message.is_empty() {
                    operation.failure_text().to_string()
                } else {
                    message
                });
            }
            Action::SetFilter(filter) => self.filter = filter,
            Action::SetSortBy(field) => self.sort_by = field,
            Action::SetSortOrder(order) => self.sort_order = order,
            Action::ClearFilters => {
                self.filter = TaskFilter::default();
                self.sort_by = SortField::CreatedAt;
                self.sort_order = SortOrder::Desc;
            }
            Action::ClearError => self.error = None,
        }
    }

    fn fulfil(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Fetched(tasks) => {
                self.loading = false;
                self.tasks = tasks;
            }
            Outcome::Created(task) => self.tasks.insert(0, task),
            Outcome::Updated(task) | Outcome::StatusUpdated(task) => {
                if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == task.id) {
                    *slot = task;
                }
            }
            Outcome::Deleted(id) => self.tasks.retain(|t| t.id != id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use shared::{NewTask, TaskPriority, TaskStatus};

    fn task(title: &str) -> Task {
        Task::new(
            NewTask {
                title: title.to_string(),
                description: None,
                status: TaskStatus::Todo,
                priority: TaskPriority::Medium,
                due_date: None,
            },
            Utc::now(),
        )
    }

    #[fixture]
    fn loaded() -> (TaskState, Vec<Task>) {
        let tasks = vec![task("a"), task("b"), task("c")];
        let mut state = TaskState::default();
        state.apply(Action::Fulfilled(Outcome::Fetched(tasks.clone())));
        (state, tasks)
    }

    fn titles(state: &TaskState) -> Vec<&str> {
        state.tasks().iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn defaults() {
        let state = TaskState::default();
        assert!(state.tasks().is_empty());
        assert!(!state.loading());
        assert_eq!(state.error(), None);
        assert_eq!(state.query(), TaskQuery::default());
        assert_eq!(state.request_status(Operation::Fetch), RequestStatus::Idle);
    }

    #[test]
    fn fetch_lifecycle() {
        let mut state = TaskState::default();
        state.apply(Action::Rejected(Operation::Create, "boom".into()));

        state.apply(Action::Pending(Operation::Fetch));
        assert!(state.loading());
        assert_eq!(state.error(), None);
        assert_eq!(state.request_status(Operation::Fetch), RequestStatus::Pending);

        state.apply(Action::Fulfilled(Outcome::Fetched(vec![task("x")])));
        assert!(!state.loading());
        assert_eq!(titles(&state), vec!["x"]);
        assert_eq!(state.request_status(Operation::Fetch), RequestStatus::Fulfilled);
    }

    #[rstest]
    fn fetch_failure_keeps_last_known_tasks(loaded: (TaskState, Vec<Task>)) {
        let (mut state, _) = loaded;
        state.apply(Action::Pending(Operation::Fetch));
        state.apply(Action::Rejected(Operation::Fetch, "Network Error".into()));
        assert!(!state.loading());
        assert_eq!(state.error(), Some("Network Error"));
        assert_eq!(titles(&state), vec!["a", "b", "c"]);
    }

    #[rstest]
    #[case(Operation::Fetch, "Failed to fetch tasks")]
    #[case(Operation::Create, "Failed to create task")]
    #[case(Operation::Update, "Failed to update task")]
    #[case(Operation::UpdateStatus, "Failed to update task status")]
    #[case(Operation::Delete, "Failed to delete task")]
    fn empty_failure_messages_get_a_default(#[case] operation: Operation, #[case] text: &str) {
        let mut state = TaskState::default();
        state.apply(Action::Rejected(operation, String::new()));
        assert_eq!(state.error(), Some(text));
        assert_eq!(state.request_status(operation), RequestStatus::Rejected);
    }

    #[rstest]
    fn created_tasks_go_first(loaded: (TaskState, Vec<Task>)) {
        let (mut state, _) = loaded;
        state.apply(Action::Fulfilled(Outcome::Created(task("new"))));
        assert_eq!(titles(&state), vec!["new", "a", "b", "c"]);
    }

    #[rstest]
    fn updates_replace_in_place(loaded: (TaskState, Vec<Task>)) {
        let (mut state, tasks) = loaded;
        let mut changed = tasks[1].clone();
        changed.title = "B".to_string();
        state.apply(Action::Fulfilled(Outcome::Updated(changed)));

        let mut done = tasks[2].clone();
        done.status = TaskStatus::Done;
        state.apply(Action::Fulfilled(Outcome::StatusUpdated(done)));

        assert_eq!(titles(&state), vec!["a", "B", "c"]);
        assert_eq!(state.tasks()[2].status, TaskStatus::Done);
    }

    #[rstest]
    fn updates_for_unknown_tasks_change_nothing(loaded: (TaskState, Vec<Task>)) {
        let (mut state, _) = loaded;
        let before = state.tasks().to_vec();
        state.apply(Action::Fulfilled(Outcome::Updated(task("stranger"))));
        assert_eq!(state.tasks(), before.as_slice());
    }

    #[rstest]
    fn delete_removes_by_id(loaded: (TaskState, Vec<Task>)) {
        let (mut state, tasks) = loaded;
        state.apply(Action::Pending(Operation::Delete));
        assert_eq!(state.tasks().len(), 3);
        state.apply(Action::Fulfilled(Outcome::Deleted(tasks[0].id)));
        assert_eq!(titles(&state), vec!["b", "c"]);
    }

    #[rstest]
    fn failed_delete_leaves_the_task(loaded: (TaskState, Vec<Task>)) {
        let (mut state, _) = loaded;
        state.apply(Action::Pending(Operation::Delete));
        state.apply(Action::Rejected(Operation::Delete, "Task not found".into()));
        assert_eq!(state.tasks().len(), 3);
        assert!(!state.loading());
    }

    #[rstest]
    fn filter_and_sort_do_not_touch_tasks(loaded: (TaskState, Vec<Task>)) {
        let (mut state, _) = loaded;
        let filter = TaskFilter {
            status: Some(TaskStatus::Done),
            priority: Some(TaskPriority::High),
        };
        state.apply(Action::SetFilter(filter));
        state.apply(Action::SetSortBy(SortField::Title));
        state.apply(Action::SetSortOrder(SortOrder::Asc));

        assert_eq!(state.tasks().len(), 3);
        assert_eq!(
            state.query(),
            TaskQuery {
                filter,
                sort_by: Some(SortField::Title),
                order: SortOrder::Asc,
            }
        );

        state.apply(Action::ClearFilters);
        assert_eq!(state.query(), TaskQuery::default());
    }

    #[test]
    fn clear_error() {
        let mut state = TaskState::default();
        state.apply(Action::Rejected(Operation::Update, "nope".into()));
        state.apply(Action::ClearError);
        assert_eq!(state.error(), None);
    }

    #[test]
    fn late_responses_overwrite_newer_ones() {
        let mut state = TaskState::default();
        state.apply(Action::Pending(Operation::Fetch));
        state.apply(Action::Pending(Operation::Fetch));
        state.apply(Action::Fulfilled(Outcome::Fetched(vec![task("newer")])));
        state.apply(Action::Fulfilled(Outcome::Fetched(vec![task("older")])));
        assert_eq!(titles(&state), vec!["older"]);
    }
}
