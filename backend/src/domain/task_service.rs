//! Task mutation and query service.
//!
//! Implements the task driving ports over a [`TaskRepository`]. Each
//! operation on a single task loads it first: a missing id is `not_found`,
//! a task owned by someone else is `forbidden`. The 403 reveals that the id
//! exists; callers rely on that distinction.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, warn};

use crate::domain::ports::{TaskCommand, TaskRepository, TaskRepositoryError, TasksQuery};
use crate::domain::{
    Error, NewTask, Task, TaskDraft, TaskId, TaskListQuery, TaskPatch, TaskQueryBuilder, UserId,
};

/// Message returned when a task belongs to another owner.
pub const FOREIGN_TASK_MESSAGE: &str = "access denied: task belongs to another user";

pub(crate) fn map_repository_error(error: TaskRepositoryError) -> Error {
    error!(%error, "task repository failure");
    match error {
        TaskRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("task repository unavailable: {message}"))
        }
        TaskRepositoryError::Query { message } => {
            Error::internal(format!("task repository error: {message}"))
        }
    }
}

fn task_not_found(id: TaskId) -> Error {
    Error::not_found(format!("task {id} not found"))
}

/// Task service implementing [`TaskCommand`] and [`TasksQuery`].
#[derive(Clone)]
pub struct TaskService<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> TaskService<R> {
    /// Create a service over `repo`, stamping times from `clock`.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// use taskboard::domain::TaskService;
    /// use taskboard::outbound::memory::InMemoryTaskRepository;
    ///
    /// let service = TaskService::new(
    ///     Arc::new(InMemoryTaskRepository::default()),
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

impl<R> TaskService<R>
where
    R: TaskRepository,
{
    async fn load_owned(&self, owner: &UserId, id: TaskId) -> Result<Task, Error> {
        let task = self
            .repo
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| task_not_found(id))?;
        if &task.owner_id != owner {
            warn!(task_id = %id, caller = %owner, "task belongs to another user");
            return Err(Error::forbidden(FOREIGN_TASK_MESSAGE));
        }
        Ok(task)
    }

    async fn store(&self, task: Task) -> Result<Task, Error> {
        self.repo
            .update(&task)
            .await
            .map_err(map_repository_error)?;
        Ok(task)
    }
}

#[async_trait]
impl<R> TaskCommand for TaskService<R>
where
    R: TaskRepository,
{
    async fn create(&self, owner: &UserId, draft: TaskDraft) -> Result<Task, Error> {
        let new_task = NewTask::from_draft(owner.clone(), draft, self.clock.utc());
        self.repo
            .insert(&new_task)
            .await
            .map_err(map_repository_error)
    }

    async fn update(&self, owner: &UserId, id: TaskId, patch: TaskPatch) -> Result<Task, Error> {
        let mut task = self.load_owned(owner, id).await?;
        task.apply(patch, self.clock.utc());
        self.store(task).await
    }

    async fn delete(&self, owner: &UserId, id: TaskId) -> Result<(), Error> {
        self.load_owned(owner, id).await?;
        self.repo.delete(id).await.map_err(map_repository_error)
    }

    async fn toggle_complete(&self, owner: &UserId, id: TaskId) -> Result<Task, Error> {
        let mut task = self.load_owned(owner, id).await?;
        task.toggle_complete(self.clock.utc());
        self.store(task).await
    }
}

#[async_trait]
impl<R> TasksQuery for TaskService<R>
where
    R: TaskRepository,
{
    async fn get(&self, owner: &UserId, id: TaskId) -> Result<Task, Error> {
        self.load_owned(owner, id).await
    }

    async fn list(&self, owner: &UserId, query: &TaskListQuery) -> Result<Vec<Task>, Error> {
        let selection = TaskQueryBuilder::new(owner.clone()).with_query(query).build();
        self.repo
            .list(&selection)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "task_service_tests.rs"]
mod tests;
