//! Axum router construction.
//!
//! [`build`] assembles the complete application router, including:
//! - Middleware layers (CORS, per-request trace-ID injection, body limit)
//! - Optional Swagger UI / OpenAPI spec endpoint (disable with `TUTOR_ENABLE_SWAGGER=false`)
//! - Every JSON route, nested under `/api`

mod chat;
pub mod doc;
mod grade;
mod health;
mod students;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use utoipa_swagger_ui::SwaggerUi;

use crate::middleware::{cors, trace};
use crate::state::AppState;

/// Largest accepted request body (papers are pasted in whole).
pub const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .merge(health::router())
        .merge(chat::router())
        .merge(grade::router())
        .merge(students::router());

    let mut app = Router::new().nest("/api", api_router);

    if state.config.enable_swagger {
        app = app.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", doc::get_docs()));
    }

    app
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        // Outermost layers execute first on the way in.
        .layer(cors::cors_layer(&state))
        .layer(middleware::from_fn(trace::trace_middleware))
        .with_state(state)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
