//! Driven port for task persistence.

use async_trait::async_trait;

use crate::domain::{NewTask, Task, TaskId, TaskSelection};

use super::define_port_error;

define_port_error! {
    /// Errors raised by task repository adapters.
    pub enum TaskRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "task repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "task repository query failed: {message}",
    }
}

/// Record store for tasks.
///
/// Adapters must honour every predicate and sort key of a
/// [`TaskSelection`]; they must never return rows outside its owner scope.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Store a new task and return it with its assigned id.
    async fn insert(&self, task: &NewTask) -> Result<Task, TaskRepositoryError>;

    /// Fetch a task by id regardless of owner.
    async fn find_by_id(&self, id: TaskId) -> Result<Option<Task>, TaskRepositoryError>;

    /// Fetch every task matching `selection`, in its order.
    async fn list(&self, selection: &TaskSelection) -> Result<Vec<Task>, TaskRepositoryError>;

    /// Overwrite the mutable fields of an existing task.
    async fn update(&self, task: &Task) -> Result<(), TaskRepositoryError>;

    /// Permanently remove a task.
    async fn delete(&self, id: TaskId) -> Result<(), TaskRepositoryError>;
}
