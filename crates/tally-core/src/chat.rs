//! Chat assistant state machine
//!
//! `Idle -> Sending -> Idle`. A submission appends the user's turn right away
//! and yields the request to send; the caller runs it wherever it likes and
//! hands the outcome back through [`ChatWidget::resolve`]. Failures never
//! escape: they become an in-character assistant message.

use anyhow::Result;
use tracing::{info, warn};

use crate::ai::{CompletionClient, CompletionRequest};
use crate::config::Settings;
use crate::profile::FirmProfile;
use crate::state::ChatMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatStatus {
    #[default]
    Idle,
    Sending,
}

#[derive(Debug, Clone)]
pub struct ChatWidget {
    transcript: Vec<ChatMessage>,
    status: ChatStatus,
    model: String,
    persona: String,
    empty_reply: String,
    failure_reply: String,
    scroll_to_bottom: bool,
}

impl ChatWidget {
    pub fn new(profile: &FirmProfile, model: &str, persona: &str) -> Self {
        Self {
            transcript: Vec::new(),
            status: ChatStatus::Idle,
            model: model.to_string(),
            persona: persona.to_string(),
            empty_reply: profile.assistant.empty_reply.to_string(),
            failure_reply: profile.assistant.failure_reply.to_string(),
            scroll_to_bottom: false,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.profile, &settings.model, &settings.persona)
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn status(&self) -> ChatStatus {
        self.status
    }

    pub fn is_sending(&self) -> bool {
        self.status == ChatStatus::Sending
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Accept a user turn. Blank input, or input while a reply is pending,
    /// is dropped without touching the transcript.
    pub fn submit(&mut self, text: &str) -> Option<CompletionRequest> {
        let text = text.trim();
        if text.is_empty() || self.is_sending() {
            return None;
        }

        info!(chars = text.chars().count(), "chat prompt submitted");
        self.push(ChatMessage::user(text));
        self.status = ChatStatus::Sending;

        Some(CompletionRequest {
            model: self.model.clone(),
            system_instruction: self.persona.clone(),
            prompt: text.to_string(),
        })
    }

    /// Finish the in-flight request. Ignored when nothing is pending.
    pub fn resolve(&mut self, outcome: Result<String>) {
        if !self.is_sending() {
            warn!("chat reply arrived with no request in flight, ignoring");
            return;
        }

        let reply = match outcome {
            Ok(text) if !text.trim().is_empty() => {
                info!(chars = text.chars().count(), "chat reply received");
                text
            }
            Ok(_) => {
                info!("chat reply was empty");
                self.empty_reply.clone()
            }
            Err(e) => {
                warn!(error = %format!("{:#}", e), "chat request failed");
                self.failure_reply.clone()
            }
        };

        self.push(ChatMessage::assistant(reply));
        self.status = ChatStatus::Idle;
    }

    /// Submit and wait for the reply in one step. Returns false if the
    /// submission was dropped.
    pub async fn send(&mut self, text: &str, client: &dyn CompletionClient) -> bool {
        let Some(request) = self.submit(text) else {
            return false;
        };
        let outcome = client.complete(&request).await;
        self.resolve(outcome);
        true
    }

    /// True once after each append, telling the view to pin its scroll
    /// position to the newest message.
    pub fn take_scroll_to_bottom(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_bottom)
    }

    fn push(&mut self, message: ChatMessage) {
        self.transcript.push(message);
        self.scroll_to_bottom = true;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use anyhow::anyhow;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::state::ChatRole;

    /// Replies with a fixed outcome and records every request.
    struct ScriptedClient {
        reply: Option<String>,
        calls: AtomicUsize,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedClient {
        fn replying(text: &str) -> Self {
            Self {
                reply: Some(text.to_string()),
                calls: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                calls: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedClient {
        async fn complete(&self, request: &CompletionRequest) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request.clone());
            self.reply
                .clone()
                .ok_or_else(|| anyhow!("connection refused"))
        }
    }

    fn widget() -> ChatWidget {
        let profile = FirmProfile::default_profile();
        ChatWidget::new(profile, "test-model", profile.assistant.persona)
    }

    #[test]
    fn blank_input_is_ignored() {
        let mut chat = widget();
        for text in ["", "   ", "\n\t "] {
            assert!(chat.submit(text).is_none());
        }
        assert!(chat.transcript().is_empty());
        assert_eq!(chat.status(), ChatStatus::Idle);
        assert!(!chat.take_scroll_to_bottom());
    }

    #[tokio::test]
    async fn blank_input_never_reaches_the_client() {
        let mut chat = widget();
        let client = ScriptedClient::replying("unused");
        assert!(!chat.send("  ", &client).await);
        assert_eq!(client.calls(), 0);
        assert!(chat.transcript().is_empty());
    }

    #[test]
    fn submit_appends_user_turn_immediately() {
        let mut chat = widget();
        let request = chat.submit("  What is the HST deadline?  ").unwrap();

        assert_eq!(chat.transcript(), &[ChatMessage::user("What is the HST deadline?")]);
        assert!(chat.is_sending());
        assert_eq!(request.prompt, "What is the HST deadline?");
        assert_eq!(request.model, "test-model");
        assert_eq!(
            request.system_instruction,
            FirmProfile::default_profile().assistant.persona
        );
    }

    #[test]
    fn second_submit_while_sending_is_dropped() {
        let mut chat = widget();
        assert!(chat.submit("first").is_some());
        assert!(chat.submit("second").is_none());
        assert_eq!(chat.transcript().len(), 1);
        assert!(chat.is_sending());
    }

    #[test]
    fn successful_reply_follows_its_question() {
        let mut chat = widget();
        chat.submit("Do I need to register for HST?").unwrap();
        chat.resolve(Ok("Once you pass $30,000 in sales.".to_string()));

        assert_eq!(
            chat.transcript(),
            &[
                ChatMessage::user("Do I need to register for HST?"),
                ChatMessage::assistant("Once you pass $30,000 in sales."),
            ]
        );
        assert_eq!(chat.status(), ChatStatus::Idle);
    }

    #[test]
    fn empty_reply_uses_placeholder() {
        let mut chat = widget();
        chat.submit("hello").unwrap();
        chat.resolve(Ok("   ".to_string()));

        let last = chat.transcript().last().unwrap();
        assert_eq!(last.role, ChatRole::Assistant);
        assert_eq!(
            last.content,
            FirmProfile::default_profile().assistant.empty_reply
        );
    }

    #[test]
    fn failure_becomes_fallback_and_widget_recovers() {
        let mut chat = widget();
        chat.submit("hello").unwrap();
        chat.resolve(Err(anyhow!("429 Too Many Requests")));

        assert_eq!(chat.transcript().len(), 2);
        assert_eq!(
            chat.transcript()[1],
            ChatMessage::assistant(FirmProfile::default_profile().assistant.failure_reply)
        );
        assert_eq!(chat.status(), ChatStatus::Idle);
        assert!(chat.submit("try again").is_some());
        assert_eq!(chat.transcript().len(), 3);
    }

    #[test]
    fn stray_resolve_is_ignored() {
        let mut chat = widget();
        chat.resolve(Ok("unsolicited".to_string()));
        assert!(chat.transcript().is_empty());
    }

    #[test]
    fn every_append_requests_scroll_to_bottom() {
        let mut chat = widget();
        chat.submit("hello").unwrap();
        assert!(chat.take_scroll_to_bottom());
        assert!(!chat.take_scroll_to_bottom());
        chat.resolve(Ok("hi".to_string()));
        assert!(chat.take_scroll_to_bottom());
    }

    #[tokio::test]
    async fn hst_deadline_scenario() {
        let mut chat = widget();
        let client = ScriptedClient::replying("HST returns are generally due three months after your reporting period.");

        let request = chat.submit("What is the HST deadline?").unwrap();
        assert_eq!(chat.transcript(), &[ChatMessage::user("What is the HST deadline?")]);

        let outcome = client.complete(&request).await;
        chat.resolve(outcome);

        assert_eq!(chat.transcript().len(), 2);
        assert_eq!(chat.transcript()[1].role, ChatRole::Assistant);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn only_the_latest_turn_is_sent_upstream() {
        let mut chat = widget();
        let client = ScriptedClient::replying("ok");

        assert!(chat.send("first question", &client).await);
        assert!(chat.send("second question", &client).await);

        let requests = client.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].prompt, "second question");
        assert_eq!(chat.transcript().len(), 4);
    }

    #[tokio::test]
    async fn failing_client_yields_exactly_one_fallback() {
        let mut chat = widget();
        let client = ScriptedClient::failing();

        assert!(chat.send("hello", &client).await);
        assert_eq!(client.calls(), 1);
        assert_eq!(
            chat.transcript(),
            &[
                ChatMessage::user("hello"),
                ChatMessage::assistant(FirmProfile::default_profile().assistant.failure_reply),
            ]
        );
    }
}
