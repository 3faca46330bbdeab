//! Wire types shared by `tutor-server` and `tutor-client`.
//!
//! Field names follow the JSON contract of the `/api` routes (camelCase), so
//! the same structs are used for serialisation on both sides of the wire.

pub mod api;
pub mod grade;
mod lenient;
pub mod student;

pub use api::{
    ChatRequest, ChatResponse, ErrorBody, GradePaperRequest, GradePaperResponse, HealthResponse,
    MessageResponse,
};
pub use grade::LetterGrade;
pub use student::{
    CreateStudentRequest, NewStudent, STUDENT_FIELDS_REQUIRED, Student, UpdateStudentRequest,
};
