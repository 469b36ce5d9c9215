//! API error type with IntoResponse
//!
//! One exhaustive mapping from error kind to status code. Database
//! detail is logged server-side and never sent to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::DbError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Resource not found (404)
    NotFound { resource: &'static str },

    /// Known route, unsupported method (405)
    MethodNotAllowed,

    /// Persistence failure (500, logged with the endpoint)
    Database {
        endpoint: &'static str,
        source: DbError,
    },
}

impl ApiError {
    /// Map a store error raised while serving `endpoint`.
    ///
    /// ```ignore
    /// store.get(id).await.map_err(ApiError::db("GET /api/users/{id}"))?
    /// ```
    pub fn db(endpoint: &'static str) -> impl Fn(DbError) -> Self {
        move |e| match e {
            DbError::NotFound { resource, .. } => Self::NotFound { resource },
            source => Self::Database { endpoint, source },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::Validation(e) => e.to_string(),
            Self::NotFound { resource } => format!("{} not found", resource),
            Self::MethodNotAllowed => "Method not allowed".to_string(),
            Self::Database { endpoint, source } => {
                tracing::error!(endpoint, error = %source, "Database error");
                "Internal server error".to_string()
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}
