//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::ai::AiGateway;
use crate::config::Config;
use crate::db::sqlite::SqliteStore;
use crate::grading::GradeExtractor;

/// State shared across all HTTP handlers.
///
/// Built once in `main` and handed to the router; the store's lifetime is
/// the server's lifetime.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Roster store.
    pub store: Arc<SqliteStore>,
    /// Completion gateway for the chat and grading routes.
    pub ai: Arc<AiGateway>,
    /// Pulls the letter grade out of grader output.
    pub grades: Arc<dyn GradeExtractor>,
}
