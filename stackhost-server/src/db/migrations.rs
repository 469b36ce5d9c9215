//! Incremental SQL migrations from a directory
//!
//! Files ending in `.sql` are applied in lexicographic filename order.
//! Applied filenames are recorded in `schema_migrations`, so each file
//! runs exactly once across restarts. A missing directory is a no-op.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use sqlx::PgPool;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("cannot read {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("migration {file} failed: {source}")]
    Apply { file: String, source: sqlx::Error },

    #[error("migration bookkeeping failed: {0}")]
    Database(#[from] sqlx::Error),
}

/// A migration file found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    /// Filename, also the key stored in `schema_migrations`
    pub name: String,
    pub path: PathBuf,
}

/// List `*.sql` files in `dir`, sorted by filename.
pub async fn discover(dir: &Path) -> Result<Vec<Migration>, MigrationError> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(MigrationError::Io {
                path: dir.to_path_buf(),
                source,
            })
        }
    };

    let io_err = |source| MigrationError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut found = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
        let path = entry.path();
        if !tokio::fs::metadata(&path).await.map_err(io_err)?.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some("sql") {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            found.push(Migration {
                name: name.to_owned(),
                path: path.clone(),
            });
        }
    }

    found.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(found)
}

/// Apply every not-yet-applied migration in `dir`, in order.
///
/// Each file runs in its own transaction together with its bookkeeping
/// row; a failure stops the sequence and leaves later files unapplied.
/// Returns the number of files applied by this call.
pub async fn apply(pool: &PgPool, dir: &Path) -> Result<usize, MigrationError> {
    let migrations = discover(dir).await?;
    if migrations.is_empty() {
        tracing::debug!(dir = %dir.display(), "No migrations found");
        return Ok(0);
    }

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            filename TEXT PRIMARY KEY,
            applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    let done: HashSet<String> =
        sqlx::query_scalar::<_, String>("SELECT filename FROM schema_migrations")
            .fetch_all(pool)
            .await?
            .into_iter()
            .collect();

    let mut applied = 0;
    for migration in migrations {
        if done.contains(&migration.name) {
            tracing::debug!(file = %migration.name, "Migration already applied");
            continue;
        }

        let sql = tokio::fs::read_to_string(&migration.path)
            .await
            .map_err(|source| MigrationError::Io {
                path: migration.path.clone(),
                source,
            })?;

        let apply_err = |source| MigrationError::Apply {
            file: migration.name.clone(),
            source,
        };

        let mut tx = pool.begin().await?;
        sqlx::raw_sql(&sql)
            .execute(&mut *tx)
            .await
            .map_err(apply_err)?;
        sqlx::query("INSERT INTO schema_migrations (filename) VALUES ($1)")
            .bind(&migration.name)
            .execute(&mut *tx)
            .await
            .map_err(apply_err)?;
        tx.commit().await.map_err(apply_err)?;

        tracing::info!(file = %migration.name, "Applied migration");
        applied += 1;
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn missing_directory_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let found = discover(&tmp.path().join("nope")).await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn sql_files_sorted_by_name() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["010_c.sql", "002_b.sql", "001_a.sql", "README.md", "003_d.sql.bak"] {
            fs::write(tmp.path().join(name), "SELECT 1;").unwrap();
        }
        fs::create_dir(tmp.path().join("004_dir.sql")).unwrap();

        let names: Vec<String> = discover(tmp.path())
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();

        assert_eq!(names, ["001_a.sql", "002_b.sql", "010_c.sql"]);
    }

    #[tokio::test]
    async fn ordering_is_lexicographic_not_numeric() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["10_later.sql", "9_earlier.sql"] {
            fs::write(tmp.path().join(name), "SELECT 1;").unwrap();
        }

        let names: Vec<String> = discover(tmp.path())
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();

        assert_eq!(names, ["10_later.sql", "9_earlier.sql"]);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn applies_each_file_once() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = PgPool::connect(&url).await.expect("connect failed");
        let tmp = tempfile::tempdir().unwrap();
        let name = format!("900_probe_{}.sql", std::process::id());
        fs::write(
            tmp.path().join(&name),
            "CREATE TABLE IF NOT EXISTS migration_probe (n INT); INSERT INTO migration_probe VALUES (1);",
        )
        .unwrap();

        let first = apply(&pool, tmp.path()).await.expect("first apply");
        let second = apply(&pool, tmp.path()).await.expect("second apply");

        assert_eq!(first, 1);
        assert_eq!(second, 0);

        sqlx::query("DELETE FROM schema_migrations WHERE filename = $1")
            .bind(&name)
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("DROP TABLE migration_probe")
            .execute(&pool)
            .await
            .unwrap();
    }
}
