//! HTTP API routes and handlers.
//!
//! This module contains all HTTP endpoint implementations organized by domain:
//! - `invoices` - Invoice generation (auto and manual lesson counts)
//! - `storage` - Sandboxed PDF storage browsing and management
//! - `students` - Student profile CRUD
//! - `health` - Service health checks
//! - `error` - API error types
//! - `openapi` - OpenAPI specification generation

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::state::SharedState;

pub mod error;
pub mod health;
pub mod invoices;
pub mod openapi;
pub mod storage;
pub mod students;

// Re-export commonly used types
#[allow(unused_imports)]
pub use error::{ApiError, ApiResult, ErrorResponse};

// Re-export OpenAPI utilities for the gen-openapi binary
#[allow(unused_imports)]
pub use openapi::get_openapi_json;

/// Creates the combined API router with all endpoints.
///
/// # Route Structure
///
/// ```text
/// /health                - Health check
/// /swagger-ui            - Interactive API docs
/// /api
/// ├── /invoices          - Invoice generation
/// ├── /storage           - PDF storage tree and file operations
/// ├── /students          - Student CRUD
/// └── /openapi.json      - OpenAPI specification
/// ```
///
/// The CORS layer is permissive: the admin frontend is served separately.
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .nest("/health", health::router())
        .nest(
            "/api",
            Router::new()
                .route("/openapi.json", get(openapi::get_openapi_spec))
                .nest("/invoices", invoices::router())
                .nest("/storage", storage::router())
                .nest("/students", students::router()),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api/openapi.json", openapi::ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
