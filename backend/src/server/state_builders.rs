//! Builders wiring domain services to their outbound adapters.

use std::sync::Arc;

use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{TaskRepository, UserRepository};
use crate::domain::{AccountService, IdentityGate, TaskService, TokenCodec};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::{InMemoryTaskRepository, InMemoryUserRepository};
use crate::outbound::persistence::{DieselTaskRepository, DieselUserRepository};
use crate::outbound::security::Sha256PasswordHasher;

use super::ServerConfig;

/// Assemble handler state over a task store and a user store.
pub fn assemble_http_state<T, U>(
    tasks: Arc<T>,
    users: Arc<U>,
    codec: TokenCodec,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    T: TaskRepository + 'static,
    U: UserRepository + 'static,
{
    let task_service = Arc::new(TaskService::new(tasks, clock.clone()));
    let accounts = Arc::new(AccountService::new(
        users,
        Arc::new(Sha256PasswordHasher),
        codec.clone(),
        clock,
    ));
    HttpState::new(
        HttpStatePorts {
            tasks: task_service.clone(),
            tasks_query: task_service,
            accounts,
        },
        IdentityGate::new(codec),
    )
}

/// Build handler state, choosing Diesel adapters when a pool is configured.
pub(super) fn build_http_state(config: &ServerConfig, clock: Arc<dyn Clock>) -> HttpState {
    let codec = TokenCodec::new(&config.tokens, clock.clone());
    match &config.db_pool {
        Some(pool) => {
            info!("serving tasks from PostgreSQL");
            assemble_http_state(
                Arc::new(DieselTaskRepository::new(pool.clone())),
                Arc::new(DieselUserRepository::new(pool.clone())),
                codec,
                clock,
            )
        }
        None => {
            warn!("no database configured; tasks and accounts are kept in memory and lost on restart");
            assemble_http_state(
                Arc::new(InMemoryTaskRepository::default()),
                Arc::new(InMemoryUserRepository::default()),
                codec,
                clock,
            )
        }
    }
}
