//! HTTP server layer
//!
//! Axum server with:
//! - Request tracing
//! - Optional permissive CORS
//! - Graceful shutdown
//! - JSON error responses (`{"error": ...}`)

pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, run_server, AppState};
