//! OpenAPI specification generation for the tutordesk API.
//!
//! The generated OpenAPI 3 document backs the Swagger UI mounted at
//! `/swagger-ui` and is also written to disk by the `gen-openapi` binary.

use axum::Json;
use utoipa::OpenApi;

use super::error::ErrorResponse;
use super::health::HealthResponse;
use super::invoices::GenerateInvoiceResponse;
use super::storage::{CreateFolderResponse, DeleteEntryResponse};
use tutordesk_core::{NodeKind, StorageNode, StudentInput, StudentRecord};

/// Serve the OpenAPI specification as JSON.
///
/// This endpoint is available at `/api/openapi.json` and returns the
/// complete OpenAPI 3 specification for the tutordesk API.
pub async fn get_openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Returns the OpenAPI specification as a string (for writing to file).
/// Used by the gen-openapi binary.
#[must_use]
pub fn get_openapi_json() -> String {
    ApiDoc::openapi()
        .to_pretty_json()
        .expect("Failed to serialize OpenAPI spec")
}

/// Main OpenAPI document structure for tutordesk.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "tutordesk API",
        version = "0.1.0",
        description = r#"
# tutordesk API

Administrative backend for a private tutoring business.

## Overview

1. **Invoices**: Generate monthly PDF invoices, either by counting a lesson
   weekday within the billed month or from an explicit lesson count.
2. **Storage**: Browse, view, and manage the generated PDFs in a sandboxed
   year/month directory tree.
3. **Students**: Maintain student profiles (subjects, lesson days, rates).
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Local tutordesk server")
    ),
    tags(
        (
            name = "system",
            description = "Health checks and system status"
        ),
        (
            name = "invoices",
            description = "Monthly invoice generation and storage"
        ),
        (
            name = "storage",
            description = "Sandboxed PDF storage - folder tree, viewing, deletion"
        ),
        (
            name = "students",
            description = "Student profile management"
        )
    ),
    paths(
        // Health endpoints
        super::health::health_check,
        // Invoice endpoints
        super::invoices::generate_invoice_auto,
        super::invoices::generate_invoice_manual,
        // Storage endpoints
        super::storage::list_folder_tree,
        super::storage::view_file,
        super::storage::delete_entry,
        super::storage::add_folder,
        // Student endpoints
        super::students::list_students,
        super::students::create_student,
        super::students::get_student,
        super::students::update_student,
        super::students::delete_student,
    ),
    components(
        schemas(
            // Error types
            ErrorResponse,
            // Health types
            HealthResponse,
            // Invoice types
            GenerateInvoiceResponse,
            // Storage types
            StorageNode,
            NodeKind,
            DeleteEntryResponse,
            CreateFolderResponse,
            // Student types
            StudentRecord,
            StudentInput,
        )
    )
)]
pub struct ApiDoc;
