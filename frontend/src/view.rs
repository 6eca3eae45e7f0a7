use chrono::Utc;
use sauron::{
    html::{attributes::*, *},
    prelude::*,
};
use shared::{SortField, SortOrder, Task, TaskPriority, TaskStatus};

use crate::state::{Operation, RequestStatus};
use crate::{Model, Msg};

const FIELD_CLASS: &str = "w-full px-3 py-2 bg-ctp-surface0 border border-ctp-surface2 rounded-md text-ctp-text placeholder-ctp-subtext0 focus:outline-none focus:ring-2 focus:ring-ctp-blue focus:border-transparent";

fn status_badge(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => "bg-ctp-overlay0/20 text-ctp-subtext1",
        TaskStatus::InProgress => "bg-ctp-blue/20 text-ctp-blue",
        TaskStatus::Done => "bg-ctp-green/20 text-ctp-green",
    }
}

fn priority_badge(priority: TaskPriority) -> &'static str {
    match priority {
        TaskPriority::Low => "bg-ctp-teal/20 text-ctp-teal",
        TaskPriority::Medium => "bg-ctp-yellow/20 text-ctp-yellow",
        TaskPriority::High => "bg-ctp-red/20 text-ctp-red",
    }
}

/// Dims the list and blocks clicks while a fetch is in flight.
fn list_class(loading: bool) -> &'static str {
    if loading {
        "space-y-4 opacity-50 pointer-events-none transition-opacity"
    } else {
        "space-y-4 transition-opacity"
    }
}

fn is_overdue(task: &Task) -> bool {
    task.status != TaskStatus::Done && task.due_date.is_some_and(|due| due < Utc::now())
}

/// A `<select>` whose first entry, `any`, maps to the empty string.
fn choice_select(
    any: Option<&str>,
    options: Vec<(&'static str, &'static str)>,
    current: &str,
    on_pick: fn(String) -> Msg,
) -> Node<Msg> {
    let blank = any.map(|label| {
        option([value(""), selected(current.is_empty())], [text(label)])
    });
    select(
        [
            class("px-3 py-2 bg-ctp-surface0 border border-ctp-surface2 rounded-md text-ctp-text text-sm focus:outline-none focus:ring-2 focus:ring-ctp-blue"),
            on_change(move |event| on_pick(event.value())),
        ],
        blank.into_iter().chain(options.into_iter().map(|(raw, label)| {
            option([value(raw), selected(raw == current)], [text(label)])
        })),
    )
}

impl Model {
    pub(crate) fn view_page(&self) -> Node<Msg> {
        div(
            [class("min-h-screen bg-ctp-base text-ctp-text")],
            [
                self.view_header(),
                div(
                    [class("max-w-5xl mx-auto px-6 py-8 space-y-6")],
                    [
                        self.view_banners(),
                        self.view_stats(),
                        if self.form.open { self.view_form() } else { span([], []) },
                        self.view_filters(),
                        self.view_task_list(),
                    ],
                ),
            ],
        )
    }

    fn view_header(&self) -> Node<Msg> {
        let creating = self.form.open && !self.form.is_editing();
        header([class("bg-ctp-mantle shadow-lg border-b border-ctp-surface0")], [
            div([class("max-w-5xl mx-auto px-6 py-4 flex items-center justify-between")], [
                h1([class("text-2xl font-bold text-ctp-text")], [text("Task Manager")]),
                button([
                    on_click(|_| Msg::OpenCreateForm),
                    r#type("button"),
                    class("bg-ctp-blue hover:bg-ctp-sapphire text-ctp-base font-medium px-4 py-2 rounded-md transition-colors duration-200"),
                ], [text(if creating { "Cancel" } else { "New Task" })]),
            ]),
        ])
    }

    fn view_banners(&self) -> Node<Msg> {
        div([class("space-y-3")], [
            match self.state.error() {
                Some(error) => div([class("flex items-center justify-between px-4 py-3 rounded-lg bg-ctp-red/20 text-ctp-red border border-ctp-red/40")], [
                    span([], [text(error)]),
                    button([on_click(|_| Msg::DismissError), r#type("button"), class("text-sm font-medium hover:underline")], [text("Dismiss")]),
                ]),
                None => span([], []),
            },
            match &self.notice {
                Some(notice) => div([class("flex items-center justify-between px-4 py-3 rounded-lg bg-ctp-green/20 text-ctp-green border border-ctp-green/40")], [
                    span([], [text(notice)]),
                    button([on_click(|_| Msg::DismissNotice), r#type("button"), class("text-sm font-medium hover:underline")], [text("Dismiss")]),
                ]),
                None => span([], []),
            },
        ])
    }

    fn view_stats(&self) -> Node<Msg> {
        let stats = self.stats.unwrap_or_default();
        div([class("grid grid-cols-2 md:grid-cols-4 gap-4")], [
            stat_card("Total", stats.total, "text-ctp-text"),
            stat_card(TaskStatus::Todo.label(), stats.status_count(TaskStatus::Todo), "text-ctp-subtext1"),
            stat_card(TaskStatus::InProgress.label(), stats.status_count(TaskStatus::InProgress), "text-ctp-blue"),
            stat_card(TaskStatus::Done.label(), stats.status_count(TaskStatus::Done), "text-ctp-green"),
        ])
    }

    fn view_form(&self) -> Node<Msg> {
        let form = &self.form;
        let saving = [Operation::Create, Operation::Update]
            .into_iter()
            .any(|operation| self.state.request_status(operation) == RequestStatus::Pending);

        div([class("p-6 bg-ctp-surface1 rounded-lg border border-ctp-surface2")], [
            h2([class("text-xl font-semibold text-ctp-text mb-4 pb-2 border-b border-ctp-surface2")], [
                text(if form.is_editing() { "Edit Task" } else { "Add New Task" }),
            ]),
            div([class("space-y-4")], [
                input([
                    r#type("text"),
                    placeholder("Task title"),
                    value(&form.title),
                    on_input(|event| Msg::SetTitle(event.value())),
                    class(FIELD_CLASS),
                ], []),
                textarea([
                    placeholder("Description (optional)"),
                    value(&form.description),
                    on_input(|event| Msg::SetDescription(event.value())),
                    class(&format!("{FIELD_CLASS} h-20 resize-y")),
                ], []),
                div([class("flex flex-wrap gap-4")], [
                    choice_select(
                        None,
                        TaskStatus::ALL.into_iter().map(|s| (s.as_str(), s.label())).collect(),
                        form.status.as_str(),
                        Msg::SetFormStatus,
                    ),
                    choice_select(
                        None,
                        TaskPriority::ALL.into_iter().map(|p| (p.as_str(), p.label())).collect(),
                        form.priority.as_str(),
                        Msg::SetFormPriority,
                    ),
                    input([
                        r#type("date"),
                        value(&form.due_date),
                        on_input(|event| Msg::SetDueDate(event.value())),
                        class("px-3 py-2 bg-ctp-surface0 border border-ctp-surface2 rounded-md text-ctp-text text-sm"),
                    ], []),
                ]),
                match &form.error {
                    Some(error) => p([class("text-sm text-ctp-red")], [text(error)]),
                    None => span([], []),
                },
                div([class("flex gap-2")], [
                    button([
                        on_click(|_| Msg::SubmitForm),
                        r#type("button"),
                        disabled(saving),
                        class("bg-ctp-green hover:bg-ctp-teal text-ctp-base font-medium px-4 py-2 rounded-md transition-colors duration-200"),
                    ], [text(match (saving, form.is_editing()) {
                        (true, _) => "Saving...",
                        (false, true) => "Save",
                        (false, false) => "Add Task",
                    })]),
                    button([
                        on_click(|_| Msg::CloseForm),
                        r#type("button"),
                        class("bg-ctp-overlay0 hover:bg-ctp-overlay1 text-ctp-text font-medium px-4 py-2 rounded-md transition-colors duration-200"),
                    ], [text("Cancel")]),
                ]),
            ]),
        ])
    }

    fn view_filters(&self) -> Node<Msg> {
        let filter = self.state.filter();
        div([class("flex flex-wrap items-center gap-3 p-4 bg-ctp-surface0 rounded-lg border border-ctp-surface1")], [
            choice_select(
                Some("All statuses"),
                TaskStatus::ALL.into_iter().map(|s| (s.as_str(), s.label())).collect(),
                filter.status.map_or("", |s| s.as_str()),
                Msg::FilterStatus,
            ),
            choice_select(
                Some("All priorities"),
                TaskPriority::ALL.into_iter().map(|p| (p.as_str(), p.label())).collect(),
                filter.priority.map_or("", |p| p.as_str()),
                Msg::FilterPriority,
            ),
            choice_select(
                None,
                SortField::ALL.into_iter().map(|f| (f.as_str(), f.label())).collect(),
                self.state.sort_by().as_str(),
                Msg::SortBy,
            ),
            choice_select(
                None,
                [SortOrder::Desc, SortOrder::Asc].into_iter().map(|o| (o.as_str(), o.label())).collect(),
                self.state.sort_order().as_str(),
                Msg::SortOrder,
            ),
            button([
                on_click(|_| Msg::ClearFilters),
                r#type("button"),
                class("ml-auto text-sm font-medium text-ctp-subtext0 hover:text-ctp-text"),
            ], [text("Clear Filters")]),
        ])
    }

    fn view_task_list(&self) -> Node<Msg> {
        let tasks = self.state.tasks();
        if self.state.loading() && tasks.is_empty() {
            return div([class("text-center py-12 text-ctp-subtext0")], [
                span([class("animate-spin inline-block mr-2")], [text("◐")]),
                text("Loading tasks..."),
            ]);
        }
        if tasks.is_empty() {
            return div([class("text-center py-12")], [
                p([class("text-ctp-subtext0")], [text("No tasks found. Create your first task to get started!")]),
            ]);
        }
        let loading = self.state.loading();
        div([class("relative")], [
            if loading {
                div([class("text-center py-2 text-sm text-ctp-subtext0")], [
                    span([class("animate-spin inline-block mr-2")], [text("◐")]),
                    text("Refreshing tasks..."),
                ])
            } else {
                span([], [])
            },
            div(
                [class(list_class(loading))],
                tasks.iter().map(|task| self.view_task(task)).collect::<Vec<_>>(),
            ),
        ])
    }

    fn view_task(&self, task: &Task) -> Node<Msg> {
        let id = task.id;
        let overdue = is_overdue(task);

        div([
            key(task.id.to_string()),
            class(&format!(
                "border rounded-xl p-6 bg-ctp-surface0 shadow-sm transition-all duration-300 hover:shadow-lg {}",
                if overdue { "border-ctp-red" } else { "border-ctp-surface1 hover:border-ctp-blue" }
            )),
        ], [
            div([class("flex items-start gap-4")], [
                div([class("flex-1 min-w-0")], [
                    h3([class(&format!(
                        "text-lg font-semibold mb-2 {}",
                        if task.status == TaskStatus::Done { "line-through text-ctp-overlay1" } else { "text-ctp-text" }
                    ))], [text(&task.title)]),
                    match &task.description {
                        Some(description) => p([class("text-sm leading-relaxed break-words text-ctp-subtext1")], [text(description)]),
                        None => span([], []),
                    },
                    div([class("mt-3 flex flex-wrap items-center gap-2 text-xs font-medium")], [
                        span([class(&format!("px-2 py-1 rounded-full {}", status_badge(task.status)))], [text(task.status.label())]),
                        span([class(&format!("px-2 py-1 rounded-full {}", priority_badge(task.priority)))], [text(task.priority.label())]),
                        match task.due_date {
                            Some(due) => span([class(if overdue { "text-ctp-red" } else { "text-ctp-subtext0" })], [
                                text(format!("Due {}", due.format("%b %-d, %Y"))),
                            ]),
                            None => span([], []),
                        },
                    ]),
                ]),
                div([class("flex-shrink-0 flex flex-col gap-2")], [
                    div([class("flex gap-1")], TaskStatus::ALL
                        .into_iter()
                        .filter(|status| *status != task.status)
                        .map(|status| {
                            button([
                                on_click(move |_| Msg::ChangeStatus(id, status)),
                                r#type("button"),
                                class(&format!("px-2 py-1 rounded-lg text-xs {}", status_badge(status))),
                            ], [text(status.label())])
                        })
                        .collect::<Vec<_>>()),
                    div([class("flex gap-2 justify-end")], [
                        button([
                            on_click(move |_| Msg::EditTask(id)),
                            r#type("button"),
                            class("inline-flex items-center justify-center w-8 h-8 rounded-lg bg-ctp-blue/20 text-ctp-blue hover:bg-ctp-blue/30 transition-colors duration-200"),
                        ], [span([class("text-sm")], [text("✏️")])]),
                        button([
                            on_click(move |_| Msg::DeleteTask(id)),
                            r#type("button"),
                            class("inline-flex items-center justify-center w-8 h-8 rounded-lg bg-ctp-red/20 text-ctp-red hover:bg-ctp-red/30 transition-colors duration-200"),
                        ], [span([class("text-sm")], [text("🗑️")])]),
                    ]),
                ]),
            ]),
        ])
    }
}

fn stat_card(label: &str, count: u64, tone: &str) -> Node<Msg> {
    div([class("bg-ctp-surface0 rounded-lg p-4 border border-ctp-surface1")], [
        p([class("text-sm text-ctp-subtext0")], [text(label)]),
        p([class(&format!("text-2xl font-bold {tone}"))], [text(count)]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use shared::NewTask;

    fn task(status: TaskStatus, due_in_days: i64) -> Task {
        Task::new(
            NewTask {
                title: "t".to_string(),
                description: None,
                status,
                priority: TaskPriority::Medium,
                due_date: Some(Utc::now() + Duration::days(due_in_days)),
            },
            Utc::now(),
        )
    }

    #[test]
    fn overdue_only_while_unfinished() {
        assert!(is_overdue(&task(TaskStatus::Todo, -1)));
        assert!(!is_overdue(&task(TaskStatus::Done, -1)));
        assert!(!is_overdue(&task(TaskStatus::InProgress, 3)));
    }

    #[test]
    fn loaded_list_dims_while_refreshing() {
        assert!(list_class(true).contains("opacity-50"));
        assert!(!list_class(false).contains("opacity-50"));
    }
}
