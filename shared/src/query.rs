//! List filter and ordering, as carried by the `GET /api/tasks` query string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::task::{Task, TaskPriority, TaskStatus};

/// Optional status and priority criteria; both must hold when both are set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        self.status.map_or(true, |status| task.status == status)
            && self.priority.map_or(true, |priority| task.priority == priority)
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.priority.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    DueDate,
    Priority,
    Status,
    Title,
}

impl SortField {
    pub const ALL: [SortField; 6] = [
        SortField::CreatedAt,
        SortField::UpdatedAt,
        SortField::DueDate,
        SortField::Priority,
        SortField::Status,
        SortField::Title,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
            SortField::DueDate => "dueDate",
            SortField::Priority => "priority",
            SortField::Status => "status",
            SortField::Title => "title",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "Created Date",
            SortField::UpdatedAt => "Updated Date",
            SortField::DueDate => "Due Date",
            SortField::Priority => "Priority",
            SortField::Status => "Status",
            SortField::Title => "Title",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = UnknownSortField;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .into_iter()
            .find(|field| field.as_str() == value)
            .ok_or(UnknownSortField)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownSortField;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Anything other than `asc` sorts descending.
    pub fn parse_lenient(value: &str) -> Self {
        if value == "asc" {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Asc => "Ascending",
            SortOrder::Desc => "Descending",
        }
    }
}

/// A complete list request. `sort_by == None` keeps natural id order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskQuery {
    pub filter: TaskFilter,
    pub sort_by: Option<SortField>,
    pub order: SortOrder,
}

impl Default for TaskQuery {
    fn default() -> Self {
        Self {
            filter: TaskFilter::default(),
            sort_by: Some(SortField::default()),
            order: SortOrder::default(),
        }
    }
}

impl TaskQuery {
    /// Renders the query string understood by `GET /api/tasks`.
    pub fn to_query_string(&self) -> String {
        let mut pairs = Vec::with_capacity(4);
        if let Some(status) = self.filter.status {
            pairs.push(format!("status={status}"));
        }
        if let Some(priority) = self.filter.priority {
            pairs.push(format!("priority={priority}"));
        }
        if let Some(field) = self.sort_by {
            pairs.push(format!("sortBy={field}"));
        }
        pairs.push(format!("order={}", self.order.as_str()));
        pairs.join("&")
    }
}
