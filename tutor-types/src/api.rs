//! Request / response bodies for the non-roster routes.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// Body of `DELETE /api/students/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// `POST /api/chat/general`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChatRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChatResponse {
    /// Text of the first completion choice.
    pub response: String,
}

/// `POST /api/grade/paper`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GradePaperRequest {
    #[serde(
        default,
        deserialize_with = "crate::lenient::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub student_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GradePaperResponse {
    /// Full grader output, `GRADE:` line included.
    pub response: String,
    /// Extracted letter grade, `"N/A"` when none was found.
    pub grade: String,
    pub student_name: String,
}
