//! Database layer - connection pool, schema setup, and the users repository
//!
//! # Design Principles
//!
//! - One pool per process, built at startup and passed to the API layer
//! - Every statement is parameterized; user input never reaches SQL text
//! - One pooled connection per operation, released on every exit path
//! - Rely on DB constraints (email UNIQUE) instead of check-then-insert

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repos;
pub mod schema;

pub use error::DbError;
pub use pool::{Database, PoolStats};
pub use repos::{PgUserStore, UserStore};
