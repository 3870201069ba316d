//! Test helpers for inbound HTTP components.
//!
//! [`TestHarness`] wires the real services over in-memory adapters and a
//! [`MutableClock`], so handler tests exercise the same code paths as the
//! server without a database.

use std::sync::Arc;

use actix_web::http::header::AUTHORIZATION;
use actix_web::web;
use mockable::Clock;

use crate::domain::{AccountService, Email, IdentityGate, TaskService, TokenCodec, UserId};
use crate::outbound::memory::{InMemoryTaskRepository, InMemoryUserRepository};
use crate::outbound::security::Sha256PasswordHasher;
use crate::test_support::{MutableClock, test_token_codec};

use super::state::{HttpState, HttpStatePorts};

/// `Authorization` header carrying `token` as a bearer credential.
pub fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {token}"))
}

/// In-memory application state with a controllable clock.
pub struct TestHarness {
    clock: Arc<MutableClock>,
    codec: TokenCodec,
    state: web::Data<HttpState>,
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHarness {
    pub fn new() -> Self {
        let clock = MutableClock::at_fixture_instant();
        let shared: Arc<dyn Clock> = clock.clone();
        let codec = test_token_codec(shared.clone());
        let tasks = Arc::new(TaskService::new(
            Arc::new(InMemoryTaskRepository::default()),
            shared.clone(),
        ));
        let accounts = Arc::new(AccountService::new(
            Arc::new(InMemoryUserRepository::default()),
            Arc::new(Sha256PasswordHasher),
            codec.clone(),
            shared,
        ));
        let state = HttpState::new(
            HttpStatePorts {
                tasks: tasks.clone(),
                tasks_query: tasks,
                accounts,
            },
            IdentityGate::new(codec.clone()),
        );
        Self {
            clock,
            codec,
            state: web::Data::new(state),
        }
    }

    /// Shared state to register with `App::app_data`.
    pub fn state(&self) -> web::Data<HttpState> {
        self.state.clone()
    }

    pub fn clock(&self) -> &MutableClock {
        &self.clock
    }

    /// Sign a token for `user` at the harness clock's current reading.
    pub fn token_for(&self, user: &UserId, email: &Email) -> String {
        match self.codec.issue(user, email) {
            Ok(issued) => issued.token,
            Err(error) => panic!("test token signs: {error}"),
        }
    }
}
