use serde::{Deserialize, Serialize};

use crate::task::{Task, TaskPriority, TaskStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub todo: u64,
    pub in_progress: u64,
    pub done: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityCounts {
    pub high: u64,
    pub medium: u64,
    pub low: u64,
}

/// Response of `GET /api/tasks/stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: u64,
    pub by_status: StatusCounts,
    pub by_priority: PriorityCounts,
}

impl TaskStats {
    pub fn tally<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        tasks.into_iter().fold(Self::default(), |mut stats, task| {
            stats.record(task);
            stats
        })
    }

    fn record(&mut self, task: &Task) {
        self.total += 1;
        match task.status {
            TaskStatus::Todo => self.by_status.todo += 1,
            TaskStatus::InProgress => self.by_status.in_progress += 1,
            TaskStatus::Done => self.by_status.done += 1,
        }
        match task.priority {
            TaskPriority::High => self.by_priority.high += 1,
            TaskPriority::Medium => self.by_priority.medium += 1,
            TaskPriority::Low => self.by_priority.low += 1,
        }
    }

    pub fn status_count(&self, status: TaskStatus) -> u64 {
        match status {
            TaskStatus::Todo => self.by_status.todo,
            TaskStatus::InProgress => self.by_status.in_progress,
            TaskStatus::Done => self.by_status.done,
        }
    }
}
