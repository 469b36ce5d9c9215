//! stackhost CLI - runs the users API behind a reverse proxy
//!
//! Subcommands:
//! - `serve`: prepare the schema, then listen for HTTP
//! - `migrate`: prepare the schema and exit (deploy pipelines)
//!
//! Settings come from flags, the environment, or a `.env` file in the
//! working directory, in that order of precedence.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use commands::{migrate::MigrateArgs, serve::ServeArgs};
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(name = "stackhost", version, about = "Users API backed by PostgreSQL")]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize the schema, apply migrations, and serve HTTP
    Serve(ServeArgs),

    /// Initialize the schema and apply migrations, then exit
    Migrate(MigrateArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Environment wins over .env; a missing file is fine.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init(&TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Serve(args) => commands::serve::run_serve(args).await?,
        Commands::Migrate(args) => commands::migrate::run_migrate(args).await?,
    }

    Ok(())
}
