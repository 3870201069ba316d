//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use crate::domain::TokenConfig;
use crate::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) tokens: TokenConfig,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a configuration that serves from in-memory stores.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, tokens: TokenConfig) -> Self {
        Self {
            bind_addr,
            tokens,
            db_pool: None,
        }
    }

    /// Attach a database connection pool; the Diesel adapters replace the
    /// in-memory stores.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// True when a database pool is attached.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.db_pool.is_some()
    }
}
