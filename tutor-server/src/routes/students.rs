//! Roster CRUD over the student store.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use tracing::info;
use tutor_types::{
    CreateStudentRequest, ErrorBody, MessageResponse, STUDENT_FIELDS_REQUIRED, Student,
    UpdateStudentRequest,
};
use utoipa::OpenApi;

use crate::db::StudentStore;
use crate::error::ServerError;
use crate::extract::Json;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(list_students, get_student, create_student, update_student, delete_student),
    components(schemas(
        Student,
        CreateStudentRequest,
        UpdateStudentRequest,
        MessageResponse,
        ErrorBody
    ))
)]
pub struct StudentsApi;

/// Register roster routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/students", get(list_students).post(create_student))
        .route(
            "/students/{id}",
            get(get_student).put(update_student).delete(delete_student),
        )
}

/// Path ids that are not integers cannot name a student.
fn parse_id(raw: &str) -> Result<i64, ServerError> {
    raw.trim()
        .parse()
        .map_err(|_| ServerError::student_not_found())
}

#[utoipa::path(
    get,
    path = "/api/students",
    tag = "students",
    responses(
        (status = 200, description = "All students, ordered by name", body = Vec<Student>),
        (status = 500, description = "Store error", body = ErrorBody),
    )
)]
pub async fn list_students(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Student>>, ServerError> {
    Ok(Json(state.store.list_students().await?))
}

#[utoipa::path(
    get,
    path = "/api/students/{id}",
    tag = "students",
    params(("id" = i64, Path, description = "Student id")),
    responses(
        (status = 200, description = "Student", body = Student),
        (status = 404, description = "Unknown student", body = ErrorBody),
        (status = 500, description = "Store error", body = ErrorBody),
    )
)]
pub async fn get_student(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Student>, ServerError> {
    let id = parse_id(&id)?;
    state
        .store
        .get_student(id)
        .await?
        .map(Json)
        .ok_or_else(ServerError::student_not_found)
}

#[utoipa::path(
    post,
    path = "/api/students",
    tag = "students",
    request_body = CreateStudentRequest,
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 400, description = "Missing name, age or class", body = ErrorBody),
        (status = 500, description = "Store error", body = ErrorBody),
    )
)]
pub async fn create_student(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateStudentRequest>,
) -> Result<(StatusCode, Json<Student>), ServerError> {
    let new_student = req
        .validated()
        .map_err(|_| ServerError::BadRequest(STUDENT_FIELDS_REQUIRED.into()))?;

    let student = state.store.create_student(new_student).await?;
    info!(student_id = student.id, "student created");
    Ok((StatusCode::CREATED, Json(student)))
}

/// Partial update. Absent, empty-string and zero values keep the stored value.
#[utoipa::path(
    put,
    path = "/api/students/{id}",
    tag = "students",
    params(("id" = i64, Path, description = "Student id")),
    request_body = UpdateStudentRequest,
    responses(
        (status = 200, description = "Updated student", body = Student),
        (status = 404, description = "Unknown student", body = ErrorBody),
        (status = 500, description = "Store error", body = ErrorBody),
    )
)]
pub async fn update_student(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(changes): Json<UpdateStudentRequest>,
) -> Result<Json<Student>, ServerError> {
    let id = parse_id(&id)?;
    let student = state
        .store
        .update_student(id, changes)
        .await?
        .ok_or_else(ServerError::student_not_found)?;
    info!(student_id = id, "student updated");
    Ok(Json(student))
}

#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    tag = "students",
    params(("id" = i64, Path, description = "Student id")),
    responses(
        (status = 200, description = "Student deleted", body = MessageResponse),
        (status = 404, description = "Unknown student", body = ErrorBody),
        (status = 500, description = "Store error", body = ErrorBody),
    )
)]
pub async fn delete_student(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ServerError> {
    let id = parse_id(&id)?;
    if !state.store.delete_student(id).await? {
        return Err(ServerError::student_not_found());
    }
    info!(student_id = id, "student deleted");
    Ok(Json(MessageResponse {
        message: "Student deleted successfully".into(),
    }))
}
