//! Shared client state: the roster plus the three views reading it.

use tracing::{error, info};
use tutor_types::Student;

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::views::{GradingOutcome, GradingView, HomeView, RosterView, TranscriptEntry};

#[derive(Debug)]
pub struct App {
    api: ApiClient,
    students: Vec<Student>,
    pub home: HomeView,
    pub grading: GradingView,
    pub roster: RosterView,
}

impl App {
    /// Build the app and fetch the roster once. A failed fetch is logged and
    /// leaves the roster empty.
    pub async fn start(api: ApiClient) -> Self {
        let mut app = Self {
            api,
            students: Vec::new(),
            home: HomeView::default(),
            grading: GradingView::default(),
            roster: RosterView::default(),
        };
        if let Err(e) = app.refresh_roster().await {
            error!(error = %e, "failed to fetch students");
        }
        app
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Roster as last fetched, sorted by name.
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn student(&self, id: i64) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    /// Replace the roster with the server's current list.
    pub async fn refresh_roster(&mut self) -> Result<(), ClientError> {
        self.students = self.api.list_students().await?;
        info!(count = self.students.len(), "roster refreshed");
        Ok(())
    }

    pub async fn send_chat(&mut self, message: &str) -> Option<&TranscriptEntry> {
        self.home.send(&self.api, message).await
    }

    /// Grade the paper in [`GradingView`]; a successful grading refreshes
    /// the roster so the new grade shows up.
    pub async fn grade_paper(&mut self) -> Option<&GradingOutcome> {
        let graded = matches!(
            self.grading.submit(&self.api).await,
            Some(GradingOutcome::Graded(_))
        );
        if graded {
            self.refresh_logged().await;
        }
        self.grading.outcome()
    }

    pub async fn submit_student_form(&mut self) -> Result<Option<Student>, ClientError> {
        let saved = self.roster.submit(&self.api).await?;
        if saved.is_some() {
            self.refresh_logged().await;
        }
        Ok(saved)
    }

    pub async fn delete_student(
        &mut self,
        id: i64,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<bool, ClientError> {
        let deleted = self.roster.delete(&self.api, id, confirm).await?;
        if deleted {
            self.refresh_logged().await;
        }
        Ok(deleted)
    }

    async fn refresh_logged(&mut self) {
        if let Err(e) = self.refresh_roster().await {
            error!(error = %e, "failed to refresh students");
        }
    }
}
