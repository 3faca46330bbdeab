use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::LetterGrade;

/// Message returned when a create request is missing `name`, `age` or `class`.
pub const STUDENT_FIELDS_REQUIRED: &str = "Name, age, and class are required";

/// A roster record, exactly as stored in the `students` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Store-generated identifier; never reused or changed.
    pub id: i64,
    pub name: String,
    pub age: i64,
    /// Course / section label.
    pub class: String,
    /// One of the [`LetterGrade`] tokens, `"N/A"` until graded.
    pub overall_grade: String,
    /// Set once on insert.
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/students`.
///
/// All fields are optional on the wire so that a missing field produces the
/// API's own 400 message instead of a deserialisation rejection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentRequest {
    #[validate(required, length(min = 1))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// `0` counts as missing.
    #[validate(required, range(min = 1))]
    #[serde(
        default,
        deserialize_with = "crate::lenient::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub age: Option<i64>,

    #[validate(required, length(min = 1))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_grade: Option<String>,
}

/// A create request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub name: String,
    pub age: i64,
    pub class: String,
    pub overall_grade: String,
}

impl CreateStudentRequest {
    /// Validate presence of the required fields and fill in the grade default.
    pub fn validated(self) -> Result<NewStudent, ValidationErrors> {
        self.validate()?;
        match (self.name, self.age, self.class) {
            (Some(name), Some(age), Some(class)) => Ok(NewStudent {
                name,
                age,
                class,
                overall_grade: self
                    .overall_grade
                    .filter(|g| !g.is_empty())
                    .unwrap_or_else(|| LetterGrade::NotAvailable.to_string()),
            }),
            _ => Err(ValidationErrors::new()),
        }
    }
}

/// Body of `PUT /api/students/{id}`.
///
/// Absent, empty-string and zero values leave the stored column untouched.
/// Unknown fields (`id`, `createdAt`, ...) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "crate::lenient::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub age: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_grade: Option<String>,
}

impl UpdateStudentRequest {
    /// A change set that only overwrites the grade.
    pub fn grade(grade: LetterGrade) -> Self {
        Self {
            overall_grade: Some(grade.to_string()),
            ..Self::default()
        }
    }
}
