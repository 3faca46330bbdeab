//! Letter-grade extraction from grader output.
//!
//! The grading prompt asks the model to open with `GRADE: <token>`, but
//! nothing enforces it. Extraction sits behind [`GradeExtractor`] so a
//! stricter contract (structured output, say) can replace the pattern match
//! without touching the route.

use std::fmt;

use regex::Regex;
use tutor_types::LetterGrade;

/// Prefix prepended to the paper before it is sent for grading.
pub const GRADING_REQUEST_PREFIX: &str = "Please grade the following paper:\n\n";

pub trait GradeExtractor: Send + Sync + fmt::Debug {
    /// Grade found in `response`, or [`LetterGrade::NotAvailable`].
    fn extract(&self, response: &str) -> LetterGrade;
}

/// Matches `GRADE:\s*([A-F][+-]?)` case-insensitively, first occurrence wins.
///
/// The captured token is upper-cased; tokens outside the grade scale
/// (`E`, `D+`, `F-`) yield `N/A`.
#[derive(Debug, Clone)]
pub struct PatternGradeExtractor {
    pattern: Regex,
}

impl PatternGradeExtractor {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(r"(?i)GRADE:\s*([A-F][+-]?)")?,
        })
    }
}

impl GradeExtractor for PatternGradeExtractor {
    fn extract(&self, response: &str) -> LetterGrade {
        self.pattern
            .captures(response)
            .and_then(|caps| caps.get(1))
            .and_then(|token| LetterGrade::from_token(token.as_str()))
            .unwrap_or_default()
    }
}

/// Content of the user message for a grading request.
pub fn grading_prompt(paper_text: &str) -> String {
    format!("{GRADING_REQUEST_PREFIX}{paper_text}")
}
