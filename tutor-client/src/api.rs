//! Typed wrapper around the tutor HTTP API.
//!
//! Every method maps one route. Non-2xx responses become
//! [`ClientError::Api`] carrying the body's `error` text so callers can show
//! it without further decoding.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;
use tutor_types::{
    ChatRequest, ChatResponse, CreateStudentRequest, ErrorBody, GradePaperRequest,
    GradePaperResponse, HealthResponse, MessageResponse, Student, UpdateStudentRequest,
};

use crate::error::ClientError;

/// Grading a long paper can take the model a while.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// `base_url` is the API root, e.g. `http://localhost:3001/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .user_agent(concat!("tutor-client/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        send(self.http.get(self.url("/health"))).await
    }

    /// General assistant chat; returns the reply text.
    pub async fn chat(&self, message: &str) -> Result<String, ClientError> {
        let body = ChatRequest {
            message: Some(message.to_owned()),
        };
        let reply: ChatResponse = send(self.http.post(self.url("/chat/general")).json(&body)).await?;
        Ok(reply.response)
    }

    pub async fn grade_paper(
        &self,
        student_id: i64,
        paper_text: &str,
    ) -> Result<GradePaperResponse, ClientError> {
        let body = GradePaperRequest {
            student_id: Some(student_id),
            paper_text: Some(paper_text.to_owned()),
        };
        send(self.http.post(self.url("/grade/paper")).json(&body)).await
    }

    pub async fn list_students(&self) -> Result<Vec<Student>, ClientError> {
        send(self.http.get(self.url("/students"))).await
    }

    pub async fn get_student(&self, id: i64) -> Result<Student, ClientError> {
        send(self.http.get(self.url(&format!("/students/{id}")))).await
    }

    pub async fn create_student(
        &self,
        request: &CreateStudentRequest,
    ) -> Result<Student, ClientError> {
        send(self.http.post(self.url("/students")).json(request)).await
    }

    pub async fn update_student(
        &self,
        id: i64,
        request: &UpdateStudentRequest,
    ) -> Result<Student, ClientError> {
        send(self.http.put(self.url(&format!("/students/{id}"))).json(request)).await
    }

    /// Returns the server's confirmation message.
    pub async fn delete_student(&self, id: i64) -> Result<String, ClientError> {
        let reply: MessageResponse =
            send(self.http.delete(self.url(&format!("/students/{id}")))).await?;
        Ok(reply.message)
    }
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
    let response = request.send().await?;
    let status = response.status();
    debug!(status = status.as_u16(), url = %response.url(), "api response");

    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
