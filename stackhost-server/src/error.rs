//! Startup error type for stackhost-server

use thiserror::Error;

use crate::db::migrations::MigrationError;
use crate::db::DbError;

pub type StartupResult<T> = Result<T, StartupError>;

/// Anything that stops the process before or while serving.
///
/// Request-level failures never surface here; handlers convert them to
/// responses (see [`crate::http::ApiError`]).
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("database setup failed: {0}")]
    Database(#[from] DbError),

    #[error("migration failed: {0}")]
    Migration(#[from] MigrationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
