//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - One parameterized statement per operation
//! - Mutations use RETURNING instead of a second read
//! - Absent rows surface as `DbError::NotFound`

pub mod users;

pub use users::{PgUserStore, UserStore};
