//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use chrono::TimeDelta;

use crate::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
#[derive(Clone)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) session_ttl: TimeDelta,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a configuration backed by in-memory repositories.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, session_ttl: TimeDelta) -> Self {
        Self {
            bind_addr,
            session_ttl,
            db_pool: None,
        }
    }

    /// Attach a database connection pool; repositories switch to Diesel.
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

    /// Name of the persistence backend reported by the health probes.
    #[must_use]
    pub fn store_name(&self) -> &'static str {
        if self.db_pool.is_some() {
            "postgres"
        } else {
            "memory"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_to_memory_store() {
        let config = ServerConfig::new(
            "127.0.0.1:0".parse().expect("addr"),
            TimeDelta::hours(1),
        );
        assert_eq!(config.store_name(), "memory");
        assert_eq!(config.bind_addr().port(), 0);
    }
}
