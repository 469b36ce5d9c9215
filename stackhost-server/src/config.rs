//! Server and pool configuration
//!
//! Plain values with defaults. The CLI fills them from flags and the
//! environment (`PORT`, `DB_POOL_MAX`, ...); nothing here reads env vars.

use std::net::SocketAddr;
use std::time::Duration;

/// Connection pool settings, fixed once the pool is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Upper bound on live connections
    pub max_connections: u32,

    /// Idle connections older than this are closed
    pub idle_timeout: Duration,

    /// How long a request may wait for a free connection
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 20,
            idle_timeout: Duration::from_millis(30_000),
            acquire_timeout: Duration::from_millis(2_000),
        }
    }
}

/// HTTP listener settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:3000)
    pub bind_addr: SocketAddr,

    /// Allow any origin. Off by default; the reverse proxy decides
    /// cross-origin policy in a normal deployment.
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            cors_permissive: false,
        }
    }
}
