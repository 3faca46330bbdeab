use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;

/// Letter-grade tokens a student's `overallGrade` may hold.
///
/// `NotAvailable` (`"N/A"`) is the sentinel for "not graded yet" and is also
/// what grade extraction falls back to when a response carries no usable
/// `GRADE:` line.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
pub enum LetterGrade {
    #[serde(rename = "A+")]
    #[strum(serialize = "A+")]
    APlus,
    #[serde(rename = "A")]
    #[strum(serialize = "A")]
    A,
    #[serde(rename = "A-")]
    #[strum(serialize = "A-")]
    AMinus,
    #[serde(rename = "B+")]
    #[strum(serialize = "B+")]
    BPlus,
    #[serde(rename = "B")]
    #[strum(serialize = "B")]
    B,
    #[serde(rename = "B-")]
    #[strum(serialize = "B-")]
    BMinus,
    #[serde(rename = "C+")]
    #[strum(serialize = "C+")]
    CPlus,
    #[serde(rename = "C")]
    #[strum(serialize = "C")]
    C,
    #[serde(rename = "C-")]
    #[strum(serialize = "C-")]
    CMinus,
    #[serde(rename = "D")]
    #[strum(serialize = "D")]
    D,
    #[serde(rename = "F")]
    #[strum(serialize = "F")]
    F,
    #[default]
    #[serde(rename = "N/A")]
    #[strum(serialize = "N/A")]
    NotAvailable,
}

impl LetterGrade {
    /// Parse a grade token, ignoring ASCII case (`"b+"` → `B+`).
    ///
    /// Returns `None` for anything outside the token set, including tokens
    /// the `GRADE:` pattern can match but the scale does not use (`E`, `D+`, `F-`).
    pub fn from_token(token: &str) -> Option<Self> {
        token.trim().to_ascii_uppercase().parse().ok()
    }

    pub fn is_graded(self) -> bool {
        self != LetterGrade::NotAvailable
    }
}
