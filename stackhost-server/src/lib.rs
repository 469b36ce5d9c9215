//! stackhost-server: users API backed by PostgreSQL
//!
//! Exposes a single `users` resource over HTTP plus `/health` and
//! `/api/status` probes. All persistence goes through [`db::UserStore`];
//! the production store runs parameterized statements on a shared pool.

pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod models;

pub use config::{PoolConfig, ServerConfig};
pub use error::{StartupError, StartupResult};
pub use http::{build_router, run_server, AppState};

use std::path::Path;

use db::{Database, PgUserStore};

/// Connect, prepare the schema, then serve until shutdown.
///
/// Schema initialization and migrations complete before the listener
/// binds; a failure in either returns early and nothing is served.
pub async fn serve(
    database_url: &str,
    pool_config: PoolConfig,
    migrations_dir: &Path,
    server_config: ServerConfig,
) -> StartupResult<()> {
    let database = prepare_database(database_url, pool_config, migrations_dir).await?;
    let state = AppState::new(PgUserStore::new(database));

    run_server(state, server_config).await?;
    Ok(())
}

/// Connect and bring the schema up to date without serving traffic.
pub async fn prepare_database(
    database_url: &str,
    pool_config: PoolConfig,
    migrations_dir: &Path,
) -> StartupResult<Database> {
    let database = Database::connect(database_url, pool_config).await?;

    db::schema::initialize(database.pool()).await?;
    let applied = db::migrations::apply(database.pool(), migrations_dir).await?;
    tracing::info!(applied, "Database ready");

    Ok(database)
}
