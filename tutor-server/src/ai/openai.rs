//! [`ChatCompletion`] over the OpenAI chat-completions HTTP API.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::error;

use super::{AiError, ChatCompletion, CompletionRequest};

/// Bearer-authenticated JSON client for a chat-completions endpoint.
///
/// No timeout is configured; a stalled upstream stalls only the request
/// waiting on it.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl OpenAiClient {
    pub fn new(api_url: impl Into<String>, api_key: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("tutor-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();
        Self {
            http,
            api_url: api_url.into(),
            api_key,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ProviderError,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    message: Option<String>,
}

/// `error.message` from a provider error body, if the body has one.
fn provider_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|e| e.error.message)
        .filter(|m| !m.is_empty())
}

#[async_trait]
impl ChatCompletion for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, AiError> {
        let api_key = self.api_key.as_deref().ok_or(AiError::MissingCredentials)?;

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %body, "OpenAI API error");
            return Err(AiError::Api {
                status: status.as_u16(),
                message: provider_message(&body),
            });
        }

        let completion: CompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(AiError::EmptyResponse)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{Value, json};

    use super::*;
    use crate::ai::{AiGateway, GENERIC_FAILURE, Purpose};

    #[derive(Clone, Default)]
    struct Captured {
        auth: Arc<Mutex<Option<String>>>,
        body: Arc<Mutex<Option<Value>>>,
    }

    /// Serve `reply` from a throwaway upstream and return its URL.
    async fn upstream(status: StatusCode, reply: Value, captured: Captured) -> String {
        let app = Router::new()
            .route(
                "/v1/chat/completions",
                post(
                    move |State(captured): State<Captured>, headers: HeaderMap, Json(body): Json<Value>| {
                        let reply = reply.clone();
                        async move {
                            *captured.auth.lock().unwrap() = headers
                                .get("authorization")
                                .and_then(|v| v.to_str().ok())
                                .map(str::to_owned);
                            *captured.body.lock().unwrap() = Some(body);
                            (status, Json(reply))
                        }
                    },
                ),
            )
            .with_state(captured);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/v1/chat/completions")
    }

    fn gateway(url: String, key: Option<&str>) -> AiGateway {
        AiGateway::new(
            Arc::new(OpenAiClient::new(url, key.map(str::to_owned))),
            "gpt-4o-mini",
        )
    }

    #[tokio::test]
    async fn returns_first_choice_and_sends_fixed_parameters() {
        let captured = Captured::default();
        let url = upstream(
            StatusCode::OK,
            json!({ "choices": [
                { "message": { "role": "assistant", "content": "first" } },
                { "message": { "role": "assistant", "content": "second" } }
            ]}),
            captured.clone(),
        )
        .await;

        let text = gateway(url, Some("sk-test"))
            .ask(Purpose::General, "How do I plan a lesson?")
            .await
            .unwrap();
        assert_eq!(text, "first");

        assert_eq!(captured.auth.lock().unwrap().as_deref(), Some("Bearer sk-test"));
        let body = captured.body.lock().unwrap().clone().unwrap();
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["max_tokens"], 2000);
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(body["messages"].as_array().unwrap().len(), 2);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "How do I plan a lesson?");
    }

    #[tokio::test]
    async fn surfaces_provider_error_message() {
        let url = upstream(
            StatusCode::UNAUTHORIZED,
            json!({ "error": { "message": "Incorrect API key provided", "type": "invalid_request_error" } }),
            Captured::default(),
        )
        .await;

        let err = gateway(url, Some("bad")).ask(Purpose::General, "hi").await.unwrap_err();
        assert!(matches!(err, AiError::Api { status: 401, .. }));
        assert_eq!(err.client_message(), "Incorrect API key provided");
    }

    #[tokio::test]
    async fn error_without_message_is_generic() {
        let url = upstream(StatusCode::BAD_GATEWAY, json!({}), Captured::default()).await;
        let err = gateway(url, Some("k")).ask(Purpose::General, "hi").await.unwrap_err();
        assert_eq!(err.client_message(), GENERIC_FAILURE);
    }

    #[tokio::test]
    async fn empty_choices_is_an_error() {
        let url = upstream(StatusCode::OK, json!({ "choices": [] }), Captured::default()).await;
        let err = gateway(url, Some("k")).ask(Purpose::General, "hi").await.unwrap_err();
        assert!(matches!(err, AiError::EmptyResponse));
    }

    #[tokio::test]
    async fn missing_key_sends_nothing() {
        let captured = Captured::default();
        let url = upstream(StatusCode::OK, json!({}), captured.clone()).await;
        let err = gateway(url, None).ask(Purpose::General, "hi").await.unwrap_err();
        assert!(matches!(err, AiError::MissingCredentials));
        assert!(captured.body.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn unreachable_upstream_is_transport_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = gateway(format!("http://{addr}/v1/chat/completions"), Some("k"))
            .ask(Purpose::General, "hi")
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::Transport(_)));
        assert_eq!(err.client_message(), GENERIC_FAILURE);
    }

    #[test]
    fn provider_message_parsing() {
        assert_eq!(
            provider_message(r#"{"error":{"message":"quota"}}"#).as_deref(),
            Some("quota")
        );
        assert_eq!(provider_message("<html>bad gateway</html>"), None);
        assert_eq!(provider_message(r#"{"error":{"message":""}}"#), None);
    }
}
