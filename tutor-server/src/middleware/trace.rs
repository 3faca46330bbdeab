//! Per-request trace id, span and access log.

use std::time::Instant;

use axum::body::{Body, Bytes};
use axum::extract::Request;
use axum::http::{HeaderMap, HeaderValue, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::error::ServerError;
use crate::routes::BODY_LIMIT_BYTES;

pub static X_TRACE_ID: &str = "x-trace-id";

/// Bodies at or above this size are not logged.
const MAX_LOGGED_BODY: usize = 1024;

/// Tag the request with a trace id (reusing a valid caller-supplied one),
/// run it inside an `http_request` span and log status and latency.
///
/// The request body is buffered here, so this is also where the body size
/// limit is enforced: reading stops at [`BODY_LIMIT_BYTES`] and the request
/// is answered with 413.
pub async fn trace_middleware(req: Request, next: Next) -> Response {
    let start_time = Instant::now();

    let trace_id = req
        .headers()
        .get(X_TRACE_ID)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);

    let span = info_span!(
        "http_request",
        trace_id = %trace_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    async move {
        info!("→ request started");
        let header_value = HeaderValue::from_str(&trace_id.to_string()).ok();

        let (parts, body) = req.into_parts();
        let response = match read_request_body(body).await {
            Ok(bytes) => {
                log_body("request", &parts.headers, &bytes);
                let mut req = Request::from_parts(parts, Body::from(bytes));
                if let Some(value) = &header_value {
                    req.headers_mut().insert(X_TRACE_ID, value.clone());
                }
                next.run(req).await
            }
            Err(e) => e.into_response(),
        };

        let (mut parts, body) = response.into_parts();
        let bytes = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                warn!(error = %e, "failed to buffer response body");
                Bytes::new()
            }
        };
        log_body("response", &parts.headers, &bytes);
        if let Some(value) = header_value {
            parts.headers.insert(X_TRACE_ID, value);
        }

        info!(
            status = parts.status.as_u16(),
            latency_ms = start_time.elapsed().as_millis(),
            "← response finished"
        );
        Response::from_parts(parts, Body::from(bytes))
    }
    .instrument(span)
    .await
}

/// Buffer at most [`BODY_LIMIT_BYTES`] of the request body.
async fn read_request_body(body: Body) -> Result<Bytes, ServerError> {
    match Limited::new(body, BODY_LIMIT_BYTES).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            Err(ServerError::PayloadTooLarge)
        }
        Err(e) => {
            warn!(error = %e, "failed to buffer request body");
            Err(ServerError::BadRequest("Failed to read request body".into()))
        }
    }
}

/// Log `bytes` at debug level when it is small JSON.
fn log_body(direction: &str, headers: &HeaderMap, bytes: &Bytes) {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));

    if is_json && bytes.len() < MAX_LOGGED_BODY {
        debug!(body = %String::from_utf8_lossy(bytes), "{direction} body");
    } else if !bytes.is_empty() {
        debug!(size = bytes.len(), "{direction} body skipped");
    }
}
