//! `TaskRepository` over a map keyed by task id.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{TaskRepository, TaskRepositoryError};
use crate::domain::{NewTask, Task, TaskId, TaskSelection};

/// Volatile task store. Ids start at 1 and are never reused.
#[derive(Debug)]
pub struct InMemoryTaskRepository {
    tasks: Mutex<BTreeMap<TaskId, Task>>,
    next_id: AtomicI64,
}

impl Default for InMemoryTaskRepository {
    fn default() -> Self {
        Self {
            tasks: Mutex::default(),
            next_id: AtomicI64::new(1),
        }
    }
}

impl InMemoryTaskRepository {
    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<TaskId, Task>>, TaskRepositoryError> {
        self.tasks
            .lock()
            .map_err(|_| TaskRepositoryError::query("task store lock poisoned"))
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert(&self, task: &NewTask) -> Result<Task, TaskRepositoryError> {
        let id = TaskId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let stored = task.clone().with_id(id);
        self.lock()?.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: TaskId) -> Result<Option<Task>, TaskRepositoryError> {
        Ok(self.lock()?.get(&id).cloned())
    }

    async fn list(&self, selection: &TaskSelection) -> Result<Vec<Task>, TaskRepositoryError> {
        Ok(selection.apply(self.lock()?.values()))
    }

    async fn update(&self, task: &Task) -> Result<(), TaskRepositoryError> {
        let mut tasks = self.lock()?;
        let Some(slot) = tasks.get_mut(&task.id) else {
            return Err(TaskRepositoryError::query(format!(
                "task {} vanished before update",
                task.id
            )));
        };
        *slot = task.clone();
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> Result<(), TaskRepositoryError> {
        self.lock()?.remove(&id);
        Ok(())
    }
}
