//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` so they depend only
//! on domain ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::IdentityGate;
use crate::domain::ports::{AccountCommand, TaskCommand, TasksQuery};

/// Parameter object bundling the driving ports used by handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub tasks: Arc<dyn TaskCommand>,
    pub tasks_query: Arc<dyn TasksQuery>,
    pub accounts: Arc<dyn AccountCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub tasks: Arc<dyn TaskCommand>,
    pub tasks_query: Arc<dyn TasksQuery>,
    pub accounts: Arc<dyn AccountCommand>,
    pub identity: IdentityGate,
}

impl HttpState {
    /// Construct state from the port bundle and the bearer verifier.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use taskboard::domain::{AccountService, IdentityGate, TaskService, TokenCodec, TokenConfig};
    /// use taskboard::inbound::http::state::{HttpState, HttpStatePorts};
    /// use taskboard::outbound::memory::{InMemoryTaskRepository, InMemoryUserRepository};
    /// use taskboard::outbound::security::Sha256PasswordHasher;
    ///
    /// let clock = Arc::new(DefaultClock);
    /// let config = TokenConfig::new("a-long-signing-secret", "HS256").expect("valid config");
    /// let codec = TokenCodec::new(&config, clock.clone());
    /// let tasks = Arc::new(TaskService::new(
    ///     Arc::new(InMemoryTaskRepository::default()),
    ///     clock.clone(),
    /// ));
    /// let accounts = Arc::new(AccountService::new(
    ///     Arc::new(InMemoryUserRepository::default()),
    ///     Arc::new(Sha256PasswordHasher),
    ///     codec.clone(),
    ///     clock,
    /// ));
    /// let state = HttpState::new(
    ///     HttpStatePorts {
    ///         tasks: tasks.clone(),
    ///         tasks_query: tasks,
    ///         accounts,
    ///     },
    ///     IdentityGate::new(codec),
    /// );
    /// # let _ = state;
    /// ```
    pub fn new(ports: HttpStatePorts, identity: IdentityGate) -> Self {
        let HttpStatePorts {
            tasks,
            tasks_query,
            accounts,
        } = ports;
        Self {
            tasks,
            tasks_query,
            accounts,
            identity,
        }
    }
}
