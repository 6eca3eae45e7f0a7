use async_trait::async_trait;
use redis::aio::Connection;
use redis::{AsyncCommands, Client};
use shared::{Task, TaskQuery, TaskStats};
use uuid::Uuid;

use super::{select, StoreError, TaskStore};

const KEY_PREFIX: &str = "task:";
const KEY_PATTERN: &str = "task:*";

/// Redis-backed store: one JSON document per `task:{id}` key.
#[derive(Debug, Clone)]
pub struct RedisTaskStore {
    client: Client,
}

impl RedisTaskStore {
    /// Parses the URL. No connection is made until the first request.
    pub fn open(url: &str) -> Result<Self, StoreError> {
        Ok(Self {
            client: Client::open(url)?,
        })
    }

    async fn connection(&self) -> Result<Connection, StoreError> {
        Ok(self.client.get_async_connection().await?)
    }

    async fn load_all(&self) -> Result<Vec<Task>, StoreError> {
        let mut conn = self.connection().await?;
        let keys: Vec<String> = conn.keys(KEY_PATTERN).await?;
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let documents: Vec<Option<String>> =
            redis::cmd("MGET").arg(&keys).query_async(&mut conn).await?;
        Ok(keys
            .iter()
            .zip(documents)
            .filter_map(|(key, document)| decode_task(key, document.as_deref()?))
            .collect())
    }
}

fn task_key(id: Uuid) -> String {
    format!("{KEY_PREFIX}{id}")
}

// A document that no longer decodes is left in place and skipped.
fn decode_task(key: &str, document: &str) -> Option<Task> {
    match serde_json::from_str(document) {
        Ok(task) => Some(task),
        Err(error) => {
            tracing::warn!(key, %error, "skipping undecodable task document");
            None
        }
    }
}

#[async_trait]
impl TaskStore for RedisTaskStore {
    async fn list(&self, query: &TaskQuery) -> Result<Vec<Task>, StoreError> {
        Ok(select(self.load_all().await?, query))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let mut conn = self.connection().await?;
        let document: Option<String> = conn.get(task_key(id)).await?;
        match document {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn insert(&self, task: &Task) -> Result<(), StoreError> {
        let document = serde_json::to_string(task)?;
        let mut conn = self.connection().await?;
        let created: bool = conn.set_nx(task_key(task.id), document).await?;
        if created {
            Ok(())
        } else {
            Err(StoreError::DuplicateId(task.id))
        }
    }

    async fn replace(&self, task: &Task) -> Result<(), StoreError> {
        let document = serde_json::to_string(task)?;
        let mut conn = self.connection().await?;
        // SET .. XX only writes when the key still exists
        let reply: Option<String> = redis::cmd("SET")
            .arg(task_key(task.id))
            .arg(document)
            .arg("XX")
            .query_async(&mut conn)
            .await?;
        match reply {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(task.id)),
        }
    }

    async fn remove(&self, id: Uuid) -> Result<(), StoreError> {
        let mut conn = self.connection().await?;
        let deleted: usize = conn.del(task_key(id)).await?;
        if deleted > 0 {
            Ok(())
        } else {
            Err(StoreError::NotFound(id))
        }
    }

    async fn stats(&self) -> Result<TaskStats, StoreError> {
        Ok(TaskStats::tally(&self.load_all().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::NewTask;

    #[test]
    fn keys_are_prefixed_ids() {
        let id = Uuid::nil();
        assert_eq!(task_key(id), "task:00000000-0000-0000-0000-000000000000");
        assert!(task_key(id).starts_with(KEY_PATTERN.trim_end_matches('*')));
    }

    #[test]
    fn decodes_stored_documents() {
        let task = Task::new(
            NewTask {
                title: "stored".to_string(),
                description: Some("json".to_string()),
                status: Default::default(),
                priority: Default::default(),
                due_date: None,
            },
            Utc::now(),
        );
        let document = serde_json::to_string(&task).unwrap();
        assert_eq!(decode_task("task:x", &document), Some(task));
    }

    #[test]
    fn skips_corrupt_documents() {
        assert_eq!(decode_task("task:x", "{not json"), None);
        assert_eq!(decode_task("task:x", r#"{"title":"no id"}"#), None);
    }

    #[test]
    fn open_rejects_malformed_urls() {
        assert!(RedisTaskStore::open("not a url").is_err());
        assert!(RedisTaskStore::open("redis://127.0.0.1:6379").is_ok());
    }
}
