//! Multi-tenant task management service.
//!
//! The crate follows a ports-and-adapters layout: [`domain`] holds the
//! entities, services and port traits; [`inbound`] and [`outbound`] hold the
//! HTTP and storage adapters; [`server`] wires them together.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
