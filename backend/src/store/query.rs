use std::cmp::Ordering;

use shared::{SortField, SortOrder, Task, TaskQuery};

/// Applies a list query to a set of records.
///
/// Records are first put in natural id order (creation order, ids are UUID
/// v7). The requested sort is stable on top of that, so ties keep creation
/// order in either direction. Without a sort field the natural order is the
/// result and `order` is ignored.
pub fn select(tasks: impl IntoIterator<Item = Task>, query: &TaskQuery) -> Vec<Task> {
    let mut selected: Vec<Task> = tasks
        .into_iter()
        .filter(|task| query.filter.matches(task))
        .collect();
    selected.sort_by_key(|task| task.id);

    if let Some(field) = query.sort_by {
        selected.sort_by(|a, b| {
            let ordering = compare(field, a, b);
            match query.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }
    selected
}

fn compare(field: SortField, a: &Task, b: &Task) -> Ordering {
    match field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        // absent due dates sort first ascending
        SortField::DueDate => a.due_date.cmp(&b.due_date),
        SortField::Priority => a.priority.cmp(&b.priority),
        SortField::Status => a.status.cmp(&b.status),
        SortField::Title => a.title.cmp(&b.title),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use shared::{NewTask, TaskFilter, TaskPriority, TaskStatus};

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap()
    }

    fn task(title: &str, priority: TaskPriority, created: i64) -> Task {
        Task::new(
            NewTask {
                title: title.to_string(),
                description: None,
                status: TaskStatus::Todo,
                priority,
                due_date: None,
            },
            at(created),
        )
    }

    fn titles(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|task| task.title.as_str()).collect()
    }

    fn sorted(field: Option<SortField>, order: SortOrder) -> TaskQuery {
        TaskQuery {
            filter: TaskFilter::default(),
            sort_by: field,
            order,
        }
    }

    #[test]
    fn sorts_by_title_ascending() {
        let tasks = vec![
            task("Banana", TaskPriority::Medium, 0),
            task("Apple", TaskPriority::Medium, 1),
        ];
        let result = select(tasks, &sorted(Some(SortField::Title), SortOrder::Asc));
        assert_eq!(titles(&result), vec!["Apple", "Banana"]);
    }

    #[test]
    fn default_query_is_newest_first() {
        let tasks = vec![
            task("old", TaskPriority::Medium, 0),
            task("new", TaskPriority::Medium, 10),
            task("middle", TaskPriority::Medium, 5),
        ];
        let result = select(tasks, &TaskQuery::default());
        assert_eq!(titles(&result), vec!["new", "middle", "old"]);
    }

    #[rstest]
    #[case(SortOrder::Asc)]
    #[case(SortOrder::Desc)]
    fn ties_keep_creation_order(#[case] order: SortOrder) {
        let tasks = vec![
            task("first", TaskPriority::High, 0),
            task("second", TaskPriority::High, 1),
            task("low", TaskPriority::Low, 2),
        ];
        let result = select(tasks.into_iter().rev(), &sorted(Some(SortField::Priority), order));
        let expected = match order {
            SortOrder::Asc => vec!["low", "first", "second"],
            SortOrder::Desc => vec!["first", "second", "low"],
        };
        assert_eq!(titles(&result), expected);
    }

    #[test]
    fn missing_sort_field_keeps_natural_order() {
        let tasks = vec![
            task("a", TaskPriority::Medium, 0),
            task("b", TaskPriority::Medium, 1),
        ];
        let result = select(tasks.into_iter().rev(), &sorted(None, SortOrder::Desc));
        assert_eq!(titles(&result), vec!["a", "b"]);
    }

    #[test]
    fn due_date_ascending_puts_undated_first() {
        let mut dated = task("dated", TaskPriority::Medium, 0);
        dated.due_date = Some(at(100));
        let undated = task("undated", TaskPriority::Medium, 1);
        let result = select(vec![dated, undated], &sorted(Some(SortField::DueDate), SortOrder::Asc));
        assert_eq!(titles(&result), vec!["undated", "dated"]);
    }

    #[test]
    fn filter_is_applied_before_sorting() {
        let tasks = vec![
            task("high", TaskPriority::High, 0),
            task("low", TaskPriority::Low, 1),
        ];
        let query = TaskQuery {
            filter: TaskFilter {
                status: Some(TaskStatus::Todo),
                priority: Some(TaskPriority::Low),
            },
            ..TaskQuery::default()
        };
        assert_eq!(titles(&select(tasks, &query)), vec!["low"]);
    }
}
