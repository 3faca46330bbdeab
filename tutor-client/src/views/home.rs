//! General assistant chat.

use crate::api::ApiClient;
use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryRole {
    User,
    Assistant,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub role: EntryRole,
    pub content: String,
}

/// Append-only chat transcript. One message may be in flight at a time.
#[derive(Debug, Default)]
pub struct HomeView {
    transcript: Vec<TranscriptEntry>,
    in_flight: bool,
}

impl HomeView {
    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    pub fn can_submit(&self, message: &str) -> bool {
        !self.in_flight && !message.trim().is_empty()
    }

    /// Append the user's message and mark the view busy. `None` when the
    /// message is blank or another one is still waiting for a reply.
    pub fn begin(&mut self, message: &str) -> Option<String> {
        if !self.can_submit(message) {
            return None;
        }
        self.push(EntryRole::User, message.to_owned());
        self.in_flight = true;
        Some(message.to_owned())
    }

    /// Record the outcome of the request started by [`HomeView::begin`].
    pub fn finish(&mut self, result: Result<String, ClientError>) {
        match result {
            Ok(reply) => self.push(EntryRole::Assistant, reply),
            Err(e) => self.push(EntryRole::Error, format!("Error: {e}")),
        }
        self.in_flight = false;
    }

    /// Send `message` and return the entry appended for the outcome.
    pub async fn send(&mut self, api: &ApiClient, message: &str) -> Option<&TranscriptEntry> {
        let message = self.begin(message)?;
        let result = api.chat(&message).await;
        self.finish(result);
        self.transcript.last()
    }

    fn push(&mut self, role: EntryRole, content: String) {
        self.transcript.push(TranscriptEntry { role, content });
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_support::FakeServer;
    use pretty_assertions::assert_eq;

    fn entry(role: EntryRole, content: &str) -> TranscriptEntry {
        TranscriptEntry {
            role,
            content: content.to_owned(),
        }
    }

    #[tokio::test]
    async fn reply_follows_user_message() {
        let server = FakeServer::start().await;
        let mut view = HomeView::default();

        let last = view.send(&server.client(), "How do I plan a lecture?").await;
        assert_eq!(last.map(|e| e.role), Some(EntryRole::Assistant));
        assert_eq!(
            view.transcript(),
            &[
                entry(EntryRole::User, "How do I plan a lecture?"),
                entry(EntryRole::Assistant, "Echo: How do I plan a lecture?"),
            ]
        );
        assert!(!view.is_busy());
    }

    #[tokio::test]
    async fn failure_becomes_error_entry() {
        let server = FakeServer::start().await;
        server.fail_ai("Rate limit reached");
        let mut view = HomeView::default();

        view.send(&server.client(), "hi").await;
        assert_eq!(
            view.transcript(),
            &[
                entry(EntryRole::User, "hi"),
                entry(EntryRole::Error, "Error: Rate limit reached"),
            ]
        );
    }

    #[tokio::test]
    async fn blank_input_sends_nothing() {
        let server = FakeServer::start().await;
        let mut view = HomeView::default();

        assert!(view.send(&server.client(), "   \n").await.is_none());
        assert!(view.transcript().is_empty());
        assert_eq!(server.count("POST /api/chat/general"), 0);
    }

    #[test]
    fn second_message_refused_while_in_flight() {
        let mut view = HomeView::default();
        assert_eq!(view.begin("first"), Some("first".to_owned()));
        assert!(view.is_busy());
        assert_eq!(view.begin("second"), None);

        view.finish(Ok("done".into()));
        assert!(!view.is_busy());
        assert_eq!(view.transcript().len(), 2);
        assert!(view.can_submit("second"));
    }
}
