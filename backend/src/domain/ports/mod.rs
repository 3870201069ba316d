//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`TaskCommand`, `TasksQuery`, `AccountCommand`) are called by
//! inbound adapters. Driven ports (`TaskRepository`, `UserRepository`,
//! `PasswordHasher`) are implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod password_hasher;
mod task_command;
mod task_repository;
mod tasks_query;
mod user_repository;

pub use account_command::AccountCommand;
#[cfg(test)]
pub use account_command::MockAccountCommand;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use task_command::MockTaskCommand;
pub use task_command::TaskCommand;
#[cfg(test)]
pub use task_repository::MockTaskRepository;
pub use task_repository::{TaskRepository, TaskRepositoryError};
#[cfg(test)]
pub use tasks_query::MockTasksQuery;
pub use tasks_query::TasksQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
