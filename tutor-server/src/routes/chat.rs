//! General question-and-answer chat.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::Router;
use tutor_types::{ChatRequest, ChatResponse, ErrorBody};
use utoipa::OpenApi;

use crate::ai::Purpose;
use crate::error::ServerError;
use crate::extract::Json;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(paths(chat_general), components(schemas(ChatRequest, ChatResponse, ErrorBody)))]
pub struct ChatApi;

/// Register chat routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/chat/general", post(chat_general))
}

/// Ask the general-purpose assistant a question.
#[utoipa::path(
    post,
    path = "/api/chat/general",
    tag = "chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant reply", body = ChatResponse),
        (status = 400, description = "Missing message", body = ErrorBody),
        (status = 500, description = "AI request failed", body = ErrorBody),
    )
)]
pub async fn chat_general(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ServerError> {
    let message = req
        .message
        .filter(|m| !m.is_empty())
        .ok_or_else(|| ServerError::BadRequest("Message is required".into()))?;

    let response = state.ai.ask(Purpose::General, message).await?;
    Ok(Json(ChatResponse { response }))
}
