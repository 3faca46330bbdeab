//! Paper grading for one selected student.

use tutor_types::GradePaperResponse;

use crate::api::ApiClient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GradingOutcome {
    Graded(GradePaperResponse),
    /// Shown in place of a result; the paper text is kept for a retry.
    Failed(String),
}

#[derive(Debug, Default)]
pub struct GradingView {
    selected_student: Option<i64>,
    paper_text: String,
    outcome: Option<GradingOutcome>,
    in_flight: bool,
}

impl GradingView {
    pub fn select_student(&mut self, id: Option<i64>) {
        self.selected_student = id;
    }

    pub fn selected_student(&self) -> Option<i64> {
        self.selected_student
    }

    pub fn set_paper_text(&mut self, text: impl Into<String>) {
        self.paper_text = text.into();
    }

    pub fn paper_text(&self) -> &str {
        &self.paper_text
    }

    pub fn outcome(&self) -> Option<&GradingOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    pub fn can_submit(&self) -> bool {
        !self.in_flight && self.selected_student.is_some() && !self.paper_text.trim().is_empty()
    }

    /// Submit the paper for the selected student. Returns `None` without a
    /// request when no student is selected or the text is blank.
    ///
    /// On success the paper text is cleared; the caller refreshes the roster.
    pub async fn submit(&mut self, api: &ApiClient) -> Option<&GradingOutcome> {
        if !self.can_submit() {
            return None;
        }
        let student_id = self.selected_student?;

        self.in_flight = true;
        self.outcome = None;
        let outcome = match api.grade_paper(student_id, &self.paper_text).await {
            Ok(result) => {
                self.paper_text.clear();
                GradingOutcome::Graded(result)
            }
            Err(e) => GradingOutcome::Failed(e.to_string()),
        };
        self.in_flight = false;
        self.outcome = Some(outcome);
        self.outcome.as_ref()
    }
}
