//! PDF storage API endpoints.
//!
//! Exposes the sandboxed storage tree: listing the folder hierarchy, viewing
//! stored PDFs inline, deleting files or whole subtrees, and creating
//! folders. Every path parameter is resolved against the storage root and
//! refused with 403 if it would escape it.

use std::path::Path;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use tutordesk_core::StorageNode;

use crate::api::error::{ApiError, ApiResult};
use crate::state::SharedState;

/// Creates the storage router with all endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/listfoldertree", get(list_folder_tree))
        .route("/view", get(view_file))
        .route("/delete", delete(delete_entry))
        .route("/addfolder", post(add_folder))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for viewing a stored file.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ViewQuery {
    /// Path of the file relative to the storage root.
    #[param(example = "2025/05/Alice Tan.pdf")]
    pub filepath: String,
}

/// Query parameters for deleting a storage entry.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteQuery {
    /// Path of the file or folder relative to the storage root.
    #[serde(rename = "filePath")]
    #[param(example = "2025/05/Alice Tan.pdf")]
    pub file_path: String,
}

/// Query parameters for creating a folder.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AddFolderQuery {
    /// Parent directory relative to the storage root; empty for the root.
    #[serde(rename = "targetDir", default)]
    #[param(example = "2025")]
    pub target_dir: String,

    /// Name of the folder to create.
    #[serde(rename = "folderName")]
    #[param(example = "05")]
    pub folder_name: String,
}

/// Response after deleting a storage entry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({"deleted": true, "path": "2025/05/Alice Tan.pdf"}))]
pub struct DeleteEntryResponse {
    /// Whether an entry was deleted.
    pub deleted: bool,

    /// The path that was deleted, relative to the storage root.
    pub path: String,
}

/// Response after creating a folder.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({"created": true, "path": "2025/05"}))]
pub struct CreateFolderResponse {
    /// Whether the folder was created.
    pub created: bool,

    /// The created path, relative to the storage root.
    pub path: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// List the storage root as a tree of folders.
///
/// Top-level folders come back sorted descending by name (newest invoice
/// year first); nested entries keep filesystem enumeration order. The tree
/// is a fresh scan on every call.
#[utoipa::path(
    get,
    path = "/storage/listfoldertree",
    tag = "storage",
    operation_id = "listFolderTree",
    summary = "List the storage folder tree",
    description = "Returns the folder hierarchy under the storage root. The \
        top level contains directories only, sorted descending by name; \
        nested levels include files and keep filesystem order.",
    responses(
        (status = 200, description = "Tree listed", body = [StorageNode]),
        (status = 500, description = "Storage root could not be read")
    )
)]
pub async fn list_folder_tree(
    State(state): State<SharedState>,
) -> ApiResult<Json<Vec<StorageNode>>> {
    let tree = state.storage.list_tree("")?;
    Ok(Json(tree))
}

/// Serve a stored PDF inline.
#[utoipa::path(
    get,
    path = "/storage/view",
    tag = "storage",
    operation_id = "viewFile",
    summary = "View a stored PDF",
    description = "Returns the file bytes with an inline content disposition \
        so browsers render the PDF instead of downloading it.",
    params(ViewQuery),
    responses(
        (status = 200, description = "File bytes", body = Vec<u8>, content_type = "application/pdf"),
        (status = 403, description = "Path escapes the storage root"),
        (status = 404, description = "No such file")
    )
)]
pub async fn view_file(
    State(state): State<SharedState>,
    Query(query): Query<ViewQuery>,
) -> ApiResult<impl IntoResponse> {
    let bytes = state.storage.read_file(&query.filepath)?;

    let file_name = Path::new(&query.filepath)
        .file_name()
        .map_or_else(|| "file.pdf".to_string(), |n| n.to_string_lossy().into_owned());

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{file_name}\""),
        ),
    ];
    Ok((headers, bytes))
}

/// Delete a file or folder subtree.
///
/// Folder deletion removes descendants before parents and is not atomic: a
/// failure partway through leaves the remaining entries in place.
#[utoipa::path(
    delete,
    path = "/storage/delete",
    tag = "storage",
    operation_id = "deleteEntry",
    summary = "Delete a file or folder",
    description = "Deletes the entry at the given path. Folders are removed \
        recursively, children before parents. Deleting a missing path is a \
        404, not a server error.",
    params(DeleteQuery),
    responses(
        (status = 200, description = "Entry deleted", body = DeleteEntryResponse),
        (status = 403, description = "Path escapes the storage root"),
        (status = 404, description = "No such entry"),
        (status = 500, description = "Deletion failed partway")
    )
)]
pub async fn delete_entry(
    State(state): State<SharedState>,
    Query(query): Query<DeleteQuery>,
) -> ApiResult<Json<DeleteEntryResponse>> {
    // The storage root itself is not deletable over HTTP.
    if query.file_path.is_empty() {
        return Err(ApiError::BadRequest {
            error_code: "empty_path".to_string(),
            message: "filePath must not be empty".to_string(),
        });
    }

    let deleted = state.storage.delete_entry(&query.file_path)?;
    if !deleted {
        return Err(ApiError::NotFound {
            error_code: "not_found".to_string(),
            message: format!("Nothing to delete at '{}'", query.file_path),
        });
    }

    Ok(Json(DeleteEntryResponse {
        deleted: true,
        path: query.file_path,
    }))
}

/// Create a folder under the storage root.
#[utoipa::path(
    post,
    path = "/storage/addfolder",
    tag = "storage",
    operation_id = "addFolder",
    summary = "Create a folder",
    description = "Creates folderName under targetDir, including any missing \
        intermediate directories. Creating a folder that already exists is \
        reported as 400.",
    params(AddFolderQuery),
    responses(
        (status = 201, description = "Folder created", body = CreateFolderResponse),
        (status = 400, description = "Folder already exists or name is empty"),
        (status = 403, description = "Path escapes the storage root"),
        (status = 500, description = "Creation failed")
    )
)]
pub async fn add_folder(
    State(state): State<SharedState>,
    Query(query): Query<AddFolderQuery>,
) -> ApiResult<(StatusCode, Json<CreateFolderResponse>)> {
    if query.folder_name.is_empty() {
        return Err(ApiError::BadRequest {
            error_code: "empty_folder_name".to_string(),
            message: "folderName must not be empty".to_string(),
        });
    }

    let created = state
        .storage
        .ensure_directory(&query.target_dir, &query.folder_name)?;
    if !created {
        return Err(ApiError::BadRequest {
            error_code: "folder_already_exists".to_string(),
            message: format!(
                "Folder '{}' already exists under '{}'",
                query.folder_name, query.target_dir
            ),
        });
    }

    let path = if query.target_dir.is_empty() {
        query.folder_name
    } else {
        format!("{}/{}", query.target_dir, query.folder_name)
    };
    Ok((
        StatusCode::CREATED,
        Json(CreateFolderResponse {
            created: true,
            path,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing;

    #[tokio::test]
    async fn test_list_folder_tree_descending_order() {
        let (server, ctx) = testing::server();
        std::fs::create_dir_all(ctx.storage_root().join("2024")).unwrap();
        std::fs::create_dir_all(ctx.storage_root().join("2025")).unwrap();

        let response = server.get("/api/storage/listfoldertree").await;
        response.assert_status(StatusCode::OK);

        let tree: Vec<StorageNode> = response.json();
        let names: Vec<&str> = tree.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["2025", "2024"]);
    }

    #[tokio::test]
    async fn test_view_serves_pdf_inline() {
        let (server, ctx) = testing::server();
        std::fs::create_dir_all(ctx.storage_root().join("2025/05")).unwrap();
        std::fs::write(ctx.storage_root().join("2025/05/x.pdf"), b"%PDF-1.4 ok").unwrap();

        let response = server
            .get("/api/storage/view")
            .add_query_param("filepath", "2025/05/x.pdf")
            .await;

        response.assert_status(StatusCode::OK);
        assert_eq!(
            response.header(header::CONTENT_TYPE),
            "application/pdf"
        );
        assert_eq!(
            response.header(header::CONTENT_DISPOSITION),
            "inline; filename=\"x.pdf\""
        );
        assert_eq!(response.as_bytes().to_vec(), b"%PDF-1.4 ok".to_vec());
    }

    #[tokio::test]
    async fn test_view_missing_file_is_404() {
        let (server, _ctx) = testing::server();
        let response = server
            .get("/api/storage/view")
            .add_query_param("filepath", "2025/05/absent.pdf")
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_view_traversal_is_403() {
        let (server, _ctx) = testing::server();
        let response = server
            .get("/api/storage/view")
            .add_query_param("filepath", "a/../../etc/passwd")
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_delete_missing_entry_is_404() {
        let (server, _ctx) = testing::server();
        let response = server
            .delete("/api/storage/delete")
            .add_query_param("filePath", "absent")
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_traversal_is_403() {
        let (server, _ctx) = testing::server();
        let response = server
            .delete("/api/storage/delete")
            .add_query_param("filePath", "../outside")
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_delete_folder_subtree() {
        let (server, ctx) = testing::server();
        std::fs::create_dir_all(ctx.storage_root().join("2025/05")).unwrap();
        std::fs::write(ctx.storage_root().join("2025/05/x.pdf"), b"x").unwrap();

        let response = server
            .delete("/api/storage/delete")
            .add_query_param("filePath", "2025")
            .await;

        response.assert_status(StatusCode::OK);
        let body: DeleteEntryResponse = response.json();
        assert!(body.deleted);
        assert!(!ctx.storage_root().join("2025").exists());
    }

    #[tokio::test]
    async fn test_add_folder_created_then_conflict() {
        let (server, ctx) = testing::server();

        let first = server
            .post("/api/storage/addfolder")
            .add_query_param("targetDir", "2025")
            .add_query_param("folderName", "05")
            .await;
        first.assert_status(StatusCode::CREATED);
        let body: CreateFolderResponse = first.json();
        assert_eq!(body.path, "2025/05");
        assert!(ctx.storage_root().join("2025/05").is_dir());

        let second = server
            .post("/api/storage/addfolder")
            .add_query_param("targetDir", "2025")
            .add_query_param("folderName", "05")
            .await;
        second.assert_status(StatusCode::BAD_REQUEST);
    }
}
