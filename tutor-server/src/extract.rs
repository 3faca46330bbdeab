//! JSON bodies decoded on the API's terms.
//!
//! [`Json`] replaces `axum::Json` in the handlers so that every body problem
//! ends up as a [`ServerError`] rendered as `{"error": "..."}`:
//!
//! - a missing body, or one not sent as `application/json`, decodes as
//!   `T::default()` and the handler's required-field check answers 400;
//! - malformed JSON or wrong-typed fields are a 400 with the parser message;
//! - a body over the configured limit is a 413.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{FromRequest, Request};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ServerError;

#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = has_json_content_type(req.headers());
        let bytes = Bytes::from_request(req, state).await?;

        if !is_json || bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Json(T::default()));
        }
        serde_json::from_slice(&bytes)
            .map(Json)
            .map_err(|e| ServerError::BadRequest(format!("Invalid JSON body: {e}")))
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

impl From<BytesRejection> for ServerError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ServerError::PayloadTooLarge
        } else {
            ServerError::BadRequest(rejection.body_text())
        }
    }
}

/// `application/json` or any `application/*+json`, parameters ignored.
fn has_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| ct.split(';').next())
        .map(|mime| mime.trim().to_ascii_lowercase())
        .is_some_and(|mime| {
            mime == "application/json"
                || (mime.starts_with("application/") && mime.ends_with("+json"))
        })
}

#[cfg(test)]
mod test {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(content_type: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(header::CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        map
    }

    #[test]
    fn recognises_json_content_types() {
        assert!(has_json_content_type(&headers("application/json")));
        assert!(has_json_content_type(&headers("Application/JSON; charset=utf-8")));
        assert!(has_json_content_type(&headers("application/merge-patch+json")));
        assert!(!has_json_content_type(&headers("text/plain")));
        assert!(!has_json_content_type(&HeaderMap::new()));
    }
}
