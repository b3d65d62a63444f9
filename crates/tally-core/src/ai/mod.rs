pub mod gemini;
pub mod ollama;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

pub use gemini::GeminiClient;
pub use ollama::OllamaClient;

use crate::config::Settings;
use crate::provider::Provider;

/// One stateless, unary completion call. Conversation history is never sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub model: String,
    pub system_instruction: String,
    pub prompt: String,
}

/// A generative-text endpoint the chat widget can ask for a reply.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Returns the reply text, which may be empty when the service produced
    /// no candidate text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

/// Build the client for the configured provider.
pub fn client_for(settings: &Settings) -> Arc<dyn CompletionClient> {
    let timeout = Duration::from_secs(settings.request_timeout_secs);
    match settings.provider {
        Provider::Gemini => Arc::new(GeminiClient::new(
            &settings.gemini_base_url,
            settings.gemini_api_key.as_deref(),
            timeout,
        )),
        Provider::Ollama => Arc::new(OllamaClient::new(&settings.ollama_base_url, timeout)),
    }
}

/// Reqwest client with a whole-request timeout. Falls back to the default
/// client if the builder rejects the configuration.
pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
