//! Database connection pool management
//!
//! Wraps sqlx `PgPool` with explicit limits from [`PoolConfig`] and
//! tracks how many tasks are currently inside `acquire`, which sqlx does
//! not expose.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use serde::Serialize;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Postgres;

use super::DbError;
use crate::config::PoolConfig;

/// Shared handle to the process-wide pool. Cloning is cheap.
#[derive(Clone, Debug)]
pub struct Database {
    pool: PgPool,
    waiting: Arc<AtomicU32>,
}

/// Snapshot of pool occupancy for `/api/status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolStats {
    pub total_count: u32,
    pub idle_count: u32,
    /// Tasks currently inside [`Database::acquire`]. An acquire served by an
    /// idle connection is counted for its brief duration too, so this is an
    /// upper bound on tasks actually queued for a connection.
    pub waiting_count: u32,
}

impl Database {
    /// Open a pool against `database_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the first connection cannot be established.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let db = Database::connect("postgres://localhost/stackhost", PoolConfig::default()).await?;
    /// ```
    pub async fn connect(database_url: &str, config: PoolConfig) -> Result<Self, DbError> {
        let pool = pool_options(&config).connect(database_url).await?;

        tracing::info!(
            max_connections = config.max_connections,
            idle_timeout_ms = config.idle_timeout.as_millis() as u64,
            acquire_timeout_ms = config.acquire_timeout.as_millis() as u64,
            "Database pool connected"
        );

        Ok(Self::from_pool(pool))
    }

    /// Wrap an already-built pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            pool,
            waiting: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Raw pool, for startup routines that run outside a request.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check out one connection.
    ///
    /// Suspends while the pool is saturated; gives up with
    /// `DbError::Sqlx(PoolTimedOut)` once the acquire timeout elapses.
    /// The connection returns to the pool when dropped.
    pub async fn acquire(&self) -> Result<PoolConnection<Postgres>, DbError> {
        if self.pool.is_closed() {
            return Err(DbError::PoolClosed);
        }

        let _waiting = WaitGuard::enter(&self.waiting);
        let conn = self.pool.acquire().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to acquire database connection");
            e
        })?;

        Ok(conn)
    }

    /// Current total/idle/waiting counts.
    pub fn stats(&self) -> Result<PoolStats, DbError> {
        if self.pool.is_closed() {
            return Err(DbError::PoolClosed);
        }

        Ok(PoolStats {
            total_count: self.pool.size(),
            idle_count: self.pool.num_idle() as u32,
            waiting_count: self.waiting.load(Ordering::Relaxed),
        })
    }

    /// Close every connection; used on shutdown and in tests.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn pool_options(config: &PoolConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .idle_timeout(config.idle_timeout)
        .acquire_timeout(config.acquire_timeout)
        .after_connect(|_conn, _meta| {
            Box::pin(async move {
                tracing::debug!("Database connection established");
                Ok(())
            })
        })
}

/// Counts a task as waiting for the lifetime of the guard.
struct WaitGuard<'a>(&'a AtomicU32);

impl<'a> WaitGuard<'a> {
    fn enter(counter: &'a AtomicU32) -> Self {
        counter.fetch_add(1, Ordering::Relaxed);
        Self(counter)
    }
}

impl Drop for WaitGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}
