//! Users endpoints
//!
//! Path ids and bodies are validated by extractors and `UserPayload`
//! before the store is called; each handler issues at most one store call.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::http::error::ApiError;
use crate::http::extractors::{JsonBody, ValidUserId};
use crate::http::server::AppState;
use crate::models::{User, UserPayload};

/// GET /api/users - all users, ascending id
async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<User>>, ApiError> {
    let users = state
        .users()
        .list()
        .await
        .map_err(ApiError::db("GET /api/users"))?;

    Ok(Json(users))
}

/// GET /api/users/{id}
async fn get_user(
    State(state): State<Arc<AppState>>,
    ValidUserId(id): ValidUserId,
) -> Result<Json<User>, ApiError> {
    let user = state
        .users()
        .get(id)
        .await
        .map_err(ApiError::db("GET /api/users/{id}"))?;

    Ok(Json(user))
}

/// POST /api/users - create a user
async fn create_user(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<UserPayload>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let new_user = body.validate()?;
    let user = state
        .users()
        .create(new_user)
        .await
        .map_err(ApiError::db("POST /api/users"))?;

    tracing::info!(id = user.id, "Created user");
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /api/users/{id} - replace name and email
async fn update_user(
    State(state): State<Arc<AppState>>,
    ValidUserId(id): ValidUserId,
    JsonBody(body): JsonBody<UserPayload>,
) -> Result<Json<User>, ApiError> {
    let changes = body.validate()?;
    let user = state
        .users()
        .update(id, changes)
        .await
        .map_err(ApiError::db("PUT /api/users/{id}"))?;

    Ok(Json(user))
}

/// DELETE /api/users/{id}
async fn delete_user(
    State(state): State<Arc<AppState>>,
    ValidUserId(id): ValidUserId,
) -> Result<StatusCode, ApiError> {
    state
        .users()
        .delete(id)
        .await
        .map_err(ApiError::db("DELETE /api/users/{id}"))?;

    tracing::info!(id, "Deleted user");
    Ok(StatusCode::NO_CONTENT)
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route(
            "/api/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}
