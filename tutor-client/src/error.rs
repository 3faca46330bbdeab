use thiserror::Error;

/// Failure of one API call, displayed to the user verbatim.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced an HTTP response, or its body was unreadable.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status. `message` is the
    /// body's `error` field when it has one.
    #[error("{message}")]
    Api { status: u16, message: String },
}

impl ClientError {
    /// HTTP status for server-side failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
