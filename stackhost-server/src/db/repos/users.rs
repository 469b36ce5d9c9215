//! Users repository
//!
//! - list: ordered by ascending id
//! - create: relies on the UNIQUE constraint for email, no pre-check
//! - update: name/email replaced, phone kept when absent, cleared by null or blank
//! - delete: hard delete, NotFound when nothing matched

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::FromRow;

use crate::db::{Database, DbError, PoolStats};
use crate::models::{NewUser, User, UserId};

const RESOURCE: &str = "User";

/// Persistence operations the HTTP layer depends on.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list(&self) -> Result<Vec<User>, DbError>;

    async fn get(&self, id: UserId) -> Result<User, DbError>;

    async fn create(&self, user: NewUser) -> Result<User, DbError>;

    async fn update(&self, id: UserId, user: NewUser) -> Result<User, DbError>;

    async fn delete(&self, id: UserId) -> Result<(), DbError>;

    /// Pool occupancy, or an error if the pool is no longer usable.
    fn pool_stats(&self) -> Result<PoolStats, DbError>;
}

/// PostgreSQL-backed [`UserStore`]
#[derive(Clone)]
pub struct PgUserStore {
    db: Database,
}

impl PgUserStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

fn not_found(id: UserId) -> DbError {
    DbError::NotFound {
        resource: RESOURCE,
        id: id.to_string(),
    }
}

/// Row as stored; `created_at` is a zoneless `TIMESTAMP`.
#[derive(Debug, FromRow)]
struct UserRow {
    id: UserId,
    name: String,
    email: String,
    phone: Option<String>,
    created_at: Option<NaiveDateTime>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            created_at: row.created_at.map(|t| t.and_utc()),
        }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn list(&self) -> Result<Vec<User>, DbError> {
        let mut conn = self.db.acquire().await?;
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, phone, created_at FROM users ORDER BY id ASC",
        )
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn get(&self, id: UserId) -> Result<User, DbError> {
        let mut conn = self.db.acquire().await?;
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, phone, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| not_found(id))?;

        Ok(row.into())
    }

    async fn create(&self, user: NewUser) -> Result<User, DbError> {
        let mut conn = self.db.acquire().await?;
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (name, email, phone)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, phone, created_at
            "#,
        )
        .bind(user.name())
        .bind(user.email())
        .bind(user.phone())
        .fetch_one(&mut *conn)
        .await?;

        Ok(row.into())
    }

    async fn update(&self, id: UserId, user: NewUser) -> Result<User, DbError> {
        let mut conn = self.db.acquire().await?;
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET name = $1,
                email = $2,
                phone = CASE WHEN $3 THEN phone ELSE $4::TEXT END
            WHERE id = $5
            RETURNING id, name, email, phone, created_at
            "#,
        )
        .bind(user.name())
        .bind(user.email())
        .bind(user.keeps_phone())
        .bind(user.phone())
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| not_found(id))?;

        Ok(row.into())
    }

    async fn delete(&self, id: UserId) -> Result<(), DbError> {
        let mut conn = self.db.acquire().await?;
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    fn pool_stats(&self) -> Result<PoolStats, DbError> {
        self.db.stats()
    }
}
