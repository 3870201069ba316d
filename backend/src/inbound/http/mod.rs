//! HTTP inbound adapter exposing REST endpoints.
//!
//! Task routes are mounted under `/api`, account routes under `/auth`, and
//! probes at the root.

pub mod accounts;
pub mod auth;
pub mod error;
pub mod health;
pub mod root;
pub mod state;
pub mod tasks;
mod tasks_dto;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
