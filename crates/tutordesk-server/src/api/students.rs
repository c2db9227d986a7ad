//! Student record API endpoints.
//!
//! Conventional CRUD over the student document store. Records are referenced
//! loosely by the invoice endpoints (id and display name travel in the
//! request); there is no foreign-key enforcement between the two.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use tutordesk_core::{StudentInput, StudentRecord};

use crate::api::error::{ApiError, ApiResult};
use crate::state::SharedState;

/// Creates the students router with all CRUD endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(list_students).post(create_student))
        .route(
            "/{id}",
            get(get_student).put(update_student).delete(delete_student),
        )
}

/// List all students.
#[utoipa::path(
    get,
    path = "/students",
    tag = "students",
    operation_id = "listStudents",
    summary = "List all students",
    responses(
        (status = 200, description = "All student records", body = [StudentRecord])
    )
)]
pub async fn list_students(
    State(state): State<SharedState>,
) -> ApiResult<Json<Vec<StudentRecord>>> {
    Ok(Json(state.students.list_all()?))
}

/// Create a student.
#[utoipa::path(
    post,
    path = "/students",
    tag = "students",
    operation_id = "createStudent",
    summary = "Create a student",
    request_body = StudentInput,
    responses(
        (status = 201, description = "Student created", body = StudentRecord)
    )
)]
pub async fn create_student(
    State(state): State<SharedState>,
    Json(input): Json<StudentInput>,
) -> ApiResult<(StatusCode, Json<StudentRecord>)> {
    let record = state.students.create(input)?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Fetch a student by id.
#[utoipa::path(
    get,
    path = "/students/{id}",
    tag = "students",
    operation_id = "getStudent",
    summary = "Get a student by id",
    params(("id" = String, Path, description = "Student identifier")),
    responses(
        (status = 200, description = "The student record", body = StudentRecord),
        (status = 404, description = "No such student")
    )
)]
pub async fn get_student(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<StudentRecord>> {
    state.students.get(&id)?.map(Json).ok_or_else(|| {
        ApiError::NotFound {
            error_code: "student_not_found".to_string(),
            message: format!("No student with id '{id}'"),
        }
    })
}

/// Replace a student's profile.
#[utoipa::path(
    put,
    path = "/students/{id}",
    tag = "students",
    operation_id = "updateStudent",
    summary = "Update a student",
    params(("id" = String, Path, description = "Student identifier")),
    request_body = StudentInput,
    responses(
        (status = 200, description = "Updated record", body = StudentRecord),
        (status = 404, description = "No such student")
    )
)]
pub async fn update_student(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(input): Json<StudentInput>,
) -> ApiResult<Json<StudentRecord>> {
    let record = state.students.update(&id, input)?;
    Ok(Json(record))
}

/// Delete a student.
#[utoipa::path(
    delete,
    path = "/students/{id}",
    tag = "students",
    operation_id = "deleteStudent",
    summary = "Delete a student",
    params(("id" = String, Path, description = "Student identifier")),
    responses(
        (status = 204, description = "Student deleted"),
        (status = 404, description = "No such student")
    )
)]
pub async fn delete_student(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if state.students.delete(&id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound {
            error_code: "student_not_found".to_string(),
            message: format!("No student with id '{id}'"),
        })
    }
}
