//! In-process adapters used when no database is configured, and by tests.
//!
//! State lives behind a `Mutex` and is lost on restart.

mod task_repository;
mod user_repository;

pub use task_repository::InMemoryTaskRepository;
pub use user_repository::InMemoryUserRepository;
