//! Task persistence.
//!
//! Handlers validate and build records; a [`TaskStore`] only keeps them.
//! Both implementations share [`select`] for filtering and ordering so the
//! list semantics do not depend on the backing store.

mod memory;
mod query;
mod redis;

use async_trait::async_trait;
use shared::{Task, TaskQuery, TaskStats};
use thiserror::Error;
use uuid::Uuid;

pub use self::memory::InMemoryTaskStore;
pub use self::query::select;
pub use self::redis::RedisTaskStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("task {0} not found")]
    NotFound(Uuid),

    #[error("task {0} already exists")]
    DuplicateId(Uuid),

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<::redis::RedisError> for StoreError {
    fn from(error: ::redis::RedisError) -> Self {
        StoreError::Backend(error.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(error: serde_json::Error) -> Self {
        StoreError::Serialization(error.to_string())
    }
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Tasks matching the query's filter, in the query's order.
    async fn list(&self, query: &TaskQuery) -> Result<Vec<Task>, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<Task>, StoreError>;

    /// Stores a new record. Fails with `DuplicateId` if the id is taken.
    async fn insert(&self, task: &Task) -> Result<(), StoreError>;

    /// Overwrites an existing record. Fails with `NotFound` if it is gone.
    async fn replace(&self, task: &Task) -> Result<(), StoreError>;

    async fn remove(&self, id: Uuid) -> Result<(), StoreError>;

    async fn stats(&self) -> Result<TaskStats, StoreError>;
}
