//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories check connections out of a `bb8` pool via `diesel-async`
//! and translate between row structs (`models`) and domain types. Rows and
//! table definitions stay private to this module.
//!
//! # Example
//!
//! ```no_run
//! use taskboard::outbound::persistence::{DbPool, DieselTaskRepository, PoolConfig};
//!
//! # async fn connect() -> Result<(), taskboard::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/tasks")).await?;
//! let repo = DieselTaskRepository::new(pool);
//! # let _ = repo;
//! # Ok(())
//! # }
//! ```

mod diesel_basic_error_mapping;
mod diesel_task_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_task_repository::DieselTaskRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
