//! AI gateway: frames a teaching-assistant request as a chat completion.
//!
//! [`AiGateway`] owns everything fixed about a call (system prompts, model,
//! sampling temperature, output length). The network transport sits behind
//! the [`ChatCompletion`] trait so handlers can be exercised without an
//! outbound connection; production uses [`openai::OpenAiClient`].

pub mod openai;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info};

/// Sampling temperature sent with every request.
pub const TEMPERATURE: f32 = 0.7;

/// Output length cap sent with every request.
pub const MAX_TOKENS: u32 = 2000;

/// Surfaced to callers when the provider gave no error text of its own.
pub const GENERIC_FAILURE: &str = "Failed to get AI response";

const GENERAL_PROMPT: &str = "You are a helpful AI assistant for a professor. You help with general \
questions about teaching, lesson planning, student inquiries, and academic matters. Be \
professional, concise, and helpful.";

const GRADING_PROMPT: &str = "You are an expert academic grader and teaching assistant. Your role is to:
1. Carefully review the submitted paper/assignment text
2. Provide constructive, detailed feedback on content, structure, argumentation, and writing quality
3. Assign a letter grade (A+, A, A-, B+, B, B-, C+, C, C-, D, F) based on academic standards
4. Be fair but thorough in your assessment
5. Highlight both strengths and areas for improvement

Format your response as:
GRADE: [Letter Grade]

FEEDBACK:
[Detailed feedback here]";

/// Selects the system prompt that frames a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    General,
    Grading,
}

impl Purpose {
    pub fn system_prompt(self) -> &'static str {
        match self {
            Purpose::General => GENERAL_PROMPT,
            Purpose::Grading => GRADING_PROMPT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One role-tagged entry of the message list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// Request body of the chat-completion endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Failure of a single completion call. Nothing is retried.
#[derive(Debug, Error)]
pub enum AiError {
    /// No `OPENAI_API_KEY` was configured; no request was sent.
    #[error("OpenAI API key is not configured")]
    MissingCredentials,

    /// Connection, TLS or body-decoding failure.
    #[error("AI request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("AI request failed with status {status}: {}", message.as_deref().unwrap_or(GENERIC_FAILURE))]
    Api { status: u16, message: Option<String> },

    /// The provider answered 2xx but without a first choice's text.
    #[error("AI response contained no completion text")]
    EmptyResponse,
}

impl AiError {
    /// Message surfaced to API callers: the provider's own error text when
    /// it sent one, otherwise [`GENERIC_FAILURE`].
    pub fn client_message(&self) -> String {
        match self {
            AiError::MissingCredentials => self.to_string(),
            AiError::Api { message: Some(m), .. } => m.clone(),
            AiError::Api { message: None, .. } | AiError::Transport(_) | AiError::EmptyResponse => {
                GENERIC_FAILURE.to_owned()
            }
        }
    }
}

/// Transport that turns a [`CompletionRequest`] into the first choice's text.
#[async_trait]
pub trait ChatCompletion: Send + Sync + fmt::Debug {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, AiError>;
}

/// Builds `[system(purpose), user(content)]` and forwards it to the transport.
#[derive(Clone, Debug)]
pub struct AiGateway {
    client: Arc<dyn ChatCompletion>,
    model: String,
}

impl AiGateway {
    pub fn new(client: Arc<dyn ChatCompletion>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// The exact request [`AiGateway::ask`] sends for `purpose` and `content`.
    pub fn request(&self, purpose: Purpose, content: impl Into<String>) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: Role::System,
                    content: purpose.system_prompt().to_owned(),
                },
                Message {
                    role: Role::User,
                    content: content.into(),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }

    pub async fn ask(&self, purpose: Purpose, content: impl Into<String>) -> Result<String, AiError> {
        let request = self.request(purpose, content);
        debug!(?purpose, model = %self.model, "sending completion request");

        match self.client.complete(&request).await {
            Ok(text) => {
                info!(?purpose, output_len = text.len(), "completion done");
                Ok(text)
            }
            Err(e) => {
                error!(?purpose, error = %e, "AI request failed");
                Err(e)
            }
        }
    }
}
