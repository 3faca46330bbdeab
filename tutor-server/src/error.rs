//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors are converted to a
//! `{"error": "..."}` body with the matching status code.
//!
//! Messages are surfaced to the caller verbatim, including database and
//! provider errors; there is no separate public/private message split.
//! Body decoding failures arrive here through [`crate::extract::Json`].

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};
use tutor_types::ErrorBody;

use crate::ai::AiError;

/// All errors that can occur in the tutor-server request lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A required input was missing or empty.
    #[error("{0}")]
    BadRequest(String),

    /// The referenced student does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The completion API call failed.
    #[error(transparent)]
    Upstream(#[from] AiError),

    /// The request body exceeded the size limit.
    #[error("Request body too large")]
    PayloadTooLarge,

    /// Propagated from the SQLite store.
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl ServerError {
    pub fn student_not_found() -> Self {
        ServerError::NotFound("Student not found".into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ServerError::Upstream(_) | ServerError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ServerError::BadRequest(m) | ServerError::NotFound(m) => {
                warn!(status = status.as_u16(), message = %m, "request rejected");
                m.clone()
            }
            ServerError::PayloadTooLarge => {
                warn!(status = status.as_u16(), "request body too large");
                self.to_string()
            }
            // Already logged with the provider payload by the gateway.
            ServerError::Upstream(e) => e.client_message(),
            ServerError::Database(e) => {
                error!(error = %e, "database error");
                e.to_string()
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
