//! Idempotent schema initialization for the users table
//!
//! Runs on every process start. Each statement is conditional, so a
//! database that already has the schema (and the seed row) is left as is.

use sqlx::PgPool;

use super::DbError;

/// Base table, the later `phone` revision, and the lookup index.
const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id SERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT UNIQUE NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    "ALTER TABLE users ADD COLUMN IF NOT EXISTS phone TEXT",
    "CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)",
];

/// Rows inserted only when no user with the same email exists.
const SEED_USERS: &[(&str, &str)] = &[("Admin User", "admin@example.com")];

/// Create the users schema if missing and insert the seed rows once.
///
/// # Errors
///
/// Any failing statement aborts initialization; the caller must not
/// start serving.
pub async fn initialize(pool: &PgPool) -> Result<(), DbError> {
    tracing::info!("Initializing database schema...");

    for statement in SCHEMA_STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }

    let mut seeded = 0;
    for &(name, email) in SEED_USERS {
        // Leaves the id sequence untouched when the row already exists.
        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email)
            SELECT $1, $2
            WHERE NOT EXISTS (SELECT 1 FROM users WHERE email = $2)
            "#,
        )
        .bind(name)
        .bind(email)
        .execute(pool)
        .await?;
        seeded += result.rows_affected();
    }

    tracing::info!(seeded, "Database schema ready");
    Ok(())
}
