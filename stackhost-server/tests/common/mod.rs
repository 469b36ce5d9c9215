//! Shared helpers for HTTP-level tests
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use chrono::Utc;
use tower::ServiceExt;

use stackhost_server::db::{DbError, PoolStats, UserStore};
use stackhost_server::models::{NewUser, User, UserId};
use stackhost_server::{build_router, AppState, ServerConfig};

/// In-memory store that counts every call and can be told to fail.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    rows: Mutex<BTreeMap<UserId, User>>,
    next_id: AtomicUsize,
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.inner.rows.lock().unwrap().len()
    }

    /// Every subsequent call fails as if the pool timed out.
    pub fn fail_all(&self) {
        self.inner.failing.store(true, Ordering::SeqCst);
    }

    fn enter(&self) -> Result<(), DbError> {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);
        if self.inner.failing.load(Ordering::SeqCst) {
            return Err(DbError::Sqlx(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    fn missing(id: UserId) -> DbError {
        DbError::NotFound {
            resource: "User",
            id: id.to_string(),
        }
    }

    fn email_taken(rows: &BTreeMap<UserId, User>, email: &str, except: Option<UserId>) -> bool {
        rows.values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

fn unique_violation() -> DbError {
    DbError::Sqlx(sqlx::Error::Protocol(
        "duplicate key value violates unique constraint \"users_email_key\"".into(),
    ))
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list(&self) -> Result<Vec<User>, DbError> {
        self.enter()?;
        Ok(self.inner.rows.lock().unwrap().values().cloned().collect())
    }

    async fn get(&self, id: UserId) -> Result<User, DbError> {
        self.enter()?;
        self.inner
            .rows
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| Self::missing(id))
    }

    async fn create(&self, user: NewUser) -> Result<User, DbError> {
        self.enter()?;
        let mut rows = self.inner.rows.lock().unwrap();
        if Self::email_taken(&rows, user.email(), None) {
            return Err(unique_violation());
        }

        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst) as UserId + 1;
        let created = User {
            id,
            name: user.name().to_owned(),
            email: user.email().to_owned(),
            phone: user.phone().map(str::to_owned),
            created_at: Some(Utc::now()),
        };
        rows.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: UserId, user: NewUser) -> Result<User, DbError> {
        self.enter()?;
        let mut rows = self.inner.rows.lock().unwrap();
        if Self::email_taken(&rows, user.email(), Some(id)) {
            return Err(unique_violation());
        }

        let row = rows.get_mut(&id).ok_or_else(|| Self::missing(id))?;
        row.name = user.name().to_owned();
        row.email = user.email().to_owned();
        if !user.keeps_phone() {
            row.phone = user.phone().map(str::to_owned);
        }
        Ok(row.clone())
    }

    async fn delete(&self, id: UserId) -> Result<(), DbError> {
        self.enter()?;
        self.inner
            .rows
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Self::missing(id))
    }

    fn pool_stats(&self) -> Result<PoolStats, DbError> {
        self.enter()?;
        Ok(PoolStats {
            total_count: 1,
            idle_count: 1,
            waiting_count: 0,
        })
    }
}

pub fn app(store: MemoryStore) -> Router {
    build_router(AppState::new(store), &ServerConfig::default())
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_owned())
        }
        None => Body::empty(),
    };

    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

pub async fn json(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Send and return status plus parsed body (Null for an empty body).
pub async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let response = send(app, method, uri, body).await;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}
