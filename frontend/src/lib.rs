use sauron::prelude::*;
use shared::{SortField, SortOrder, TaskFilter, TaskPriority, TaskStats, TaskStatus};
use uuid::Uuid;
use web_sys::{console, window};

pub mod api;
pub mod form;
pub mod state;
mod view;

use form::TaskForm;
use state::{Action, Operation, Outcome, TaskState};

#[derive(Debug, Clone)]
pub enum Msg {
    Store(Action),
    LoadTasks,
    LoadStats,
    StatsLoaded(TaskStats),
    StatsFailed(String),

    // Filter bar; every change re-fetches.
    FilterStatus(String),
    FilterPriority(String),
    SortBy(String),
    SortOrder(String),
    ClearFilters,

    // Create/edit form
    OpenCreateForm,
    EditTask(Uuid),
    CloseForm,
    SetTitle(String),
    SetDescription(String),
    SetFormStatus(String),
    SetFormPriority(String),
    SetDueDate(String),
    SubmitForm,

    ChangeStatus(Uuid, TaskStatus),
    DeleteTask(Uuid),
    DismissNotice,
    DismissError,
}

#[derive(Debug, Clone, Default)]
pub struct Model {
    state: TaskState,
    stats: Option<TaskStats>,
    form: TaskForm,
    notice: Option<String>,
}

/// Empty means "any".
fn choice<T: std::str::FromStr>(raw: &str) -> Option<T> {
    if raw.is_empty() {
        None
    } else {
        raw.parse().ok()
    }
}

fn success_notice(outcome: &Outcome) -> Option<&'static str> {
    match outcome {
        Outcome::Fetched(_) => None,
        Outcome::Created(_) => Some("Task created successfully!"),
        Outcome::Updated(_) => Some("Task updated successfully!"),
        Outcome::StatusUpdated(_) => Some("Task status updated!"),
        Outcome::Deleted(_) => Some("Task deleted successfully!"),
    }
}

fn confirm(message: &str) -> bool {
    window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}

fn settle<T>(
    result: Result<T, api::ApiError>,
    operation: Operation,
    outcome: impl FnOnce(T) -> Outcome,
) -> Msg {
    match result {
        Ok(value) => Msg::Store(Action::Fulfilled(outcome(value))),
        Err(error) => Msg::Store(Action::Rejected(operation, error.to_string())),
    }
}

impl Model {
    fn refilter(&mut self, filter: TaskFilter) -> Cmd<Msg> {
        self.state.apply(Action::SetFilter(filter));
        Cmd::new(async { Msg::LoadTasks })
    }

    fn submit_form(&mut self) -> Cmd<Msg> {
        match self.form.editing {
            None => match self.form.to_create_request() {
                Ok(request) => {
                    self.state.apply(Action::Pending(Operation::Create));
                    Cmd::new(async move {
                        settle(
                            api::create_task(request).await,
                            Operation::Create,
                            Outcome::Created,
                        )
                    })
                }
                Err(error) => {
                    self.form.error = Some(error.to_string());
                    Cmd::none()
                }
            },
            Some(id) => match self.form.to_update_request() {
                Ok(request) => {
                    self.state.apply(Action::Pending(Operation::Update));
                    Cmd::new(async move {
                        settle(
                            api::update_task(id, request).await,
                            Operation::Update,
                            Outcome::Updated,
                        )
                    })
                }
                Err(error) => {
                    self.form.error = Some(error.to_string());
                    Cmd::none()
                }
            },
        }
    }
}

impl Application for Model {
    type MSG = Msg;

    fn init(&mut self) -> Cmd<Msg> {
        Cmd::batch(vec![
            Cmd::new(async { Msg::LoadTasks }),
            Cmd::new(async { Msg::LoadStats }),
        ])
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::Store(action) => {
                if let Action::Rejected(operation, message) = &action {
                    console::error_1(&format!("{operation:?} failed: {message}").into());
                }
                let notice = match &action {
                    Action::Fulfilled(outcome) => success_notice(outcome),
                    _ => None,
                };
                let saved = matches!(
                    action,
                    Action::Fulfilled(Outcome::Created(_) | Outcome::Updated(_))
                );
                self.state.apply(action);
                if saved {
                    self.form = TaskForm::default();
                }
                match notice {
                    Some(notice) => {
                        self.notice = Some(notice.to_string());
                        Cmd::new(async { Msg::LoadStats })
                    }
                    None => Cmd::none(),
                }
            }
            Msg::LoadTasks => {
                self.state.apply(Action::Pending(Operation::Fetch));
                let query = self.state.query();
                Cmd::new(async move {
                    settle(
                        api::fetch_tasks(query).await,
                        Operation::Fetch,
                        Outcome::Fetched,
                    )
                })
            }
            Msg::LoadStats => Cmd::new(async {
                match api::fetch_stats().await {
                    Ok(stats) => Msg::StatsLoaded(stats),
                    Err(error) => Msg::StatsFailed(error.to_string()),
                }
            }),
            Msg::StatsLoaded(stats) => {
                self.stats = Some(stats);
                Cmd::none()
            }
            Msg::StatsFailed(error) => {
                console::warn_1(&format!("Error fetching statistics: {error}").into());
                Cmd::none()
            }
            Msg::FilterStatus(raw) => {
                let filter = TaskFilter {
                    status: choice(&raw),
                    ..self.state.filter()
                };
                self.refilter(filter)
            }
            Msg::FilterPriority(raw) => {
                let filter = TaskFilter {
                    priority: choice(&raw),
                    ..self.state.filter()
                };
                self.refilter(filter)
            }
            Msg::SortBy(raw) => {
                let field = choice::<SortField>(&raw).unwrap_or_default();
                self.state.apply(Action::SetSortBy(field));
                Cmd::new(async { Msg::LoadTasks })
            }
            Msg::SortOrder(raw) => {
                self.state
                    .apply(Action::SetSortOrder(SortOrder::parse_lenient(&raw)));
                Cmd::new(async { Msg::LoadTasks })
            }
            Msg::ClearFilters => {
                self.state.apply(Action::ClearFilters);
                Cmd::new(async { Msg::LoadTasks })
            }
            Msg::OpenCreateForm => {
                self.form = if self.form.open && !self.form.is_editing() {
                    TaskForm::default()
                } else {
                    TaskForm::blank()
                };
                Cmd::none()
            }
            Msg::EditTask(id) => {
                if let Some(task) = self.state.tasks().iter().find(|t| t.id == id) {
                    self.form = TaskForm::from_task(task);
                }
                Cmd::none()
            }
            Msg::CloseForm => {
                self.form = TaskForm::default();
                Cmd::none()
            }
            Msg::SetTitle(title) => {
                self.form.title = title;
                self.form.error = None;
                Cmd::none()
            }
            Msg::SetDescription(description) => {
                self.form.description = description;
                self.form.error = None;
                Cmd::none()
            }
            Msg::SetFormStatus(raw) => {
                if let Some(status) = choice::<TaskStatus>(&raw) {
                    self.form.status = status;
                }
                Cmd::none()
            }
            Msg::SetFormPriority(raw) => {
                if let Some(priority) = choice::<TaskPriority>(&raw) {
                    self.form.priority = priority;
                }
                Cmd::none()
            }
            Msg::SetDueDate(due_date) => {
                self.form.due_date = due_date;
                Cmd::none()
            }
            Msg::SubmitForm => self.submit_form(),
            Msg::ChangeStatus(id, status) => {
                self.state.apply(Action::Pending(Operation::UpdateStatus));
                Cmd::new(async move {
                    settle(
                        api::update_task_status(id, status).await,
                        Operation::UpdateStatus,
                        Outcome::StatusUpdated,
                    )
                })
            }
            Msg::DeleteTask(id) => {
                if !confirm("Are you sure you want to delete this task?") {
                    return Cmd::none();
                }
                self.state.apply(Action::Pending(Operation::Delete));
                Cmd::new(async move {
                    settle(
                        api::delete_task(id).await,
                        Operation::Delete,
                        Outcome::Deleted,
                    )
                })
            }
            Msg::DismissNotice => {
                self.notice = None;
                Cmd::none()
            }
            Msg::DismissError => {
                self.state.apply(Action::ClearError);
                Cmd::none()
            }
        }
    }

    fn view(&self) -> Node<Msg> {
        self.view_page()
    }
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    Program::mount_to_body(Model::default());
}
