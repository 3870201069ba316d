//! Driving port for task reads.

use async_trait::async_trait;

use crate::domain::{Error, Task, TaskId, TaskListQuery, UserId};

/// Driving port for task read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TasksQuery: Send + Sync {
    /// Fetch one task; `not_found` if absent, `forbidden` if owned by someone else.
    async fn get(&self, owner: &UserId, id: TaskId) -> Result<Task, Error>;

    /// List the owner's tasks filtered and ordered by `query`.
    async fn list(&self, owner: &UserId, query: &TaskListQuery) -> Result<Vec<Task>, Error>;
}
