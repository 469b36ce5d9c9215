//! Schema preparation without serving

use anyhow::{Context, Result};
use clap::Parser;

use super::DatabaseArgs;

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub database: DatabaseArgs,
}

/// Initialize the schema and apply pending migrations, then exit.
pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let database_url = args.database.database_url()?;

    let database = stackhost_server::prepare_database(
        database_url,
        args.database.pool_config(),
        &args.database.migrations_dir,
    )
    .await
    .context("Failed to prepare database")?;

    database.close().await;
    Ok(())
}
