//! Paper grading: AI review plus a grade written back onto the student.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::Router;
use tracing::{info, warn};
use tutor_types::{ErrorBody, GradePaperRequest, GradePaperResponse, UpdateStudentRequest};
use utoipa::OpenApi;

use crate::ai::Purpose;
use crate::db::StudentStore;
use crate::error::ServerError;
use crate::extract::Json;
use crate::grading::grading_prompt;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(grade_paper),
    components(schemas(GradePaperRequest, GradePaperResponse, ErrorBody))
)]
pub struct GradeApi;

/// Register grading routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/grade/paper", post(grade_paper))
}

/// Grade a paper for a student and store the extracted grade.
///
/// The student is looked up before the AI call, so an unknown id costs no
/// completion. The grade is written only after the AI call succeeded; a
/// failed call leaves `overallGrade` untouched.
#[utoipa::path(
    post,
    path = "/api/grade/paper",
    tag = "grading",
    request_body = GradePaperRequest,
    responses(
        (status = 200, description = "Paper graded", body = GradePaperResponse),
        (status = 400, description = "Missing student id or paper text", body = ErrorBody),
        (status = 404, description = "Unknown student", body = ErrorBody),
        (status = 500, description = "AI request failed", body = ErrorBody),
    )
)]
pub async fn grade_paper(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GradePaperRequest>,
) -> Result<Json<GradePaperResponse>, ServerError> {
    let (Some(student_id), Some(paper_text)) = (
        req.student_id.filter(|id| *id != 0),
        req.paper_text.filter(|t| !t.is_empty()),
    ) else {
        return Err(ServerError::BadRequest(
            "Student ID and paper text are required".into(),
        ));
    };

    let student = state
        .store
        .get_student(student_id)
        .await?
        .ok_or_else(ServerError::student_not_found)?;

    let response = state
        .ai
        .ask(Purpose::Grading, grading_prompt(&paper_text))
        .await?;

    let grade = state.grades.extract(&response);
    info!(student_id, %grade, "paper graded");

    let updated = state
        .store
        .update_student(student_id, UpdateStudentRequest::grade(grade))
        .await?;
    if updated.is_none() {
        warn!(student_id, "student removed while grading; grade not stored");
    }

    Ok(Json(GradePaperResponse {
        response,
        grade: grade.to_string(),
        student_name: student.name,
    }))
}
