//! Diagnostic status endpoint - pool occupancy
//!
//! GET /api/status

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::db::PoolStats;
use crate::http::error::ApiError;
use crate::http::server::AppState;

/// Status response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub server: &'static str,
    pub database: PoolStats,
}

/// GET /api/status
async fn status(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, ApiError> {
    let database = state
        .users()
        .pool_stats()
        .map_err(ApiError::db("GET /api/status"))?;

    Ok(Json(StatusResponse {
        server: "running",
        database,
    }))
}

/// Status routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/status", get(status))
}
