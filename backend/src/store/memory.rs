use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use shared::{Task, TaskQuery, TaskStats};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{select, StoreError, TaskStore};

/// Process-local store. Contents are lost on restart.
///
/// Keyed by id in a `BTreeMap`, which keeps natural id order for free.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    tasks: Arc<RwLock<BTreeMap<Uuid, Task>>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn list(&self, query: &TaskQuery) -> Result<Vec<Task>, StoreError> {
        let tasks = self.tasks.read().await;
        Ok(select(tasks.values().cloned(), query))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        Ok(self.tasks.read().await.get(&id).cloned())
    }

    async fn insert(&self, task: &Task) -> Result<(), StoreError> {
        let mut tasks = self.tasks.write().await;
        if tasks.contains_key(&task.id) {
            return Err(StoreError::DuplicateId(task.id));
        }
        tasks.insert(task.id, task.clone());
        Ok(())
    }

    async fn replace(&self, task: &Task) -> Result<(), StoreError> {
        let mut tasks = self.tasks.write().await;
        match tasks.get_mut(&task.id) {
            Some(stored) => {
                *stored = task.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(task.id)),
        }
    }

    async fn remove(&self, id: Uuid) -> Result<(), StoreError> {
        self.tasks
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn stats(&self) -> Result<TaskStats, StoreError> {
        Ok(TaskStats::tally(self.tasks.read().await.values()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::{NewTask, TaskFilter, TaskPriority, TaskStatus};

    fn task(title: &str, status: TaskStatus) -> Task {
        Task::new(
            NewTask {
                title: title.to_string(),
                description: None,
                status,
                priority: TaskPriority::Medium,
                due_date: None,
            },
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn insert_then_get() {
        let store = InMemoryTaskStore::new();
        let created = task("a", TaskStatus::Todo);
        store.insert(&created).await.unwrap();
        assert_eq!(store.get(created.id).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected() {
        let store = InMemoryTaskStore::new();
        let created = task("a", TaskStatus::Todo);
        store.insert(&created).await.unwrap();
        let error = store.insert(&created).await.unwrap_err();
        assert!(matches!(error, StoreError::DuplicateId(id) if id == created.id));
    }

    #[tokio::test]
    async fn replace_and_remove_unknown_ids_are_not_found() {
        let store = InMemoryTaskStore::new();
        let ghost = task("ghost", TaskStatus::Todo);
        assert!(matches!(
            store.replace(&ghost).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.remove(ghost.id).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn removed_tasks_are_gone() {
        let store = InMemoryTaskStore::new();
        let created = task("a", TaskStatus::Todo);
        store.insert(&created).await.unwrap();
        store.remove(created.id).await.unwrap();
        assert_eq!(store.get(created.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn list_filters_and_stats_count() {
        let store = InMemoryTaskStore::new();
        for (title, status) in [
            ("one", TaskStatus::Todo),
            ("two", TaskStatus::Done),
            ("three", TaskStatus::Todo),
        ] {
            store.insert(&task(title, status)).await.unwrap();
        }

        let query = TaskQuery {
            filter: TaskFilter {
                status: Some(TaskStatus::Todo),
                priority: None,
            },
            ..TaskQuery::default()
        };
        let todo = store.list(&query).await.unwrap();
        assert_eq!(todo.len(), 2);
        assert!(todo.iter().all(|task| task.status == TaskStatus::Todo));

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_status.todo, 2);
        assert_eq!(stats.by_status.done, 1);
        assert_eq!(stats.by_priority.medium, 3);
    }
}
