use utoipa::OpenApi;

use crate::routes::{chat, grade, health, students};

#[derive(OpenApi)]
#[openapi(info(
    title = "tutor-server",
    description = "Teaching-assistant API: general chat, paper grading and roster management",
    version = "0.1.0",
))]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(health::HealthApi::openapi());
    root.merge(chat::ChatApi::openapi());
    root.merge(grade::GradeApi::openapi());
    root.merge(students::StudentsApi::openapi());
    root
}
