//! Driving port for task mutations.
//!
//! Every operation takes the verified owner; implementations re-check
//! existence and ownership of the target task before changing it.

use async_trait::async_trait;

use crate::domain::{Error, Task, TaskDraft, TaskId, TaskPatch, UserId};

/// Driving port for task write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskCommand: Send + Sync {
    /// Create a pending task owned by `owner`.
    async fn create(&self, owner: &UserId, draft: TaskDraft) -> Result<Task, Error>;

    /// Apply a partial update; `updated_at` is refreshed even for an empty patch.
    async fn update(&self, owner: &UserId, id: TaskId, patch: TaskPatch) -> Result<Task, Error>;

    /// Permanently delete a task.
    async fn delete(&self, owner: &UserId, id: TaskId) -> Result<(), Error>;

    /// Flip the completion flag.
    async fn toggle_complete(&self, owner: &UserId, id: TaskId) -> Result<Task, Error>;
}
