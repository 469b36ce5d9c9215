//! Subcommand implementations and their shared database arguments

pub mod migrate;
pub mod serve;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use stackhost_server::PoolConfig;

/// Connection settings shared by every subcommand that touches the database
#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Maximum pooled connections
    #[arg(long, env = "DB_POOL_MAX", default_value_t = 20)]
    pub pool_max: u32,

    /// Close connections idle for longer than this (milliseconds)
    #[arg(long, env = "DB_IDLE_TIMEOUT_MS", default_value_t = 30_000)]
    pub idle_timeout_ms: u64,

    /// Fail a request that waits longer than this for a connection (milliseconds)
    #[arg(long, env = "DB_ACQUIRE_TIMEOUT_MS", default_value_t = 2_000)]
    pub acquire_timeout_ms: u64,

    /// Directory of incremental *.sql migrations (skipped if absent)
    #[arg(long, env = "MIGRATIONS_DIR", default_value = "migrations")]
    pub migrations_dir: PathBuf,
}

impl DatabaseArgs {
    pub fn database_url(&self) -> Result<&str> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or .env")
    }

    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            max_connections: self.pool_max,
            idle_timeout: Duration::from_millis(self.idle_timeout_ms),
            acquire_timeout: Duration::from_millis(self.acquire_timeout_ms),
        }
    }
}
