use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use tally_core::{ChatRole, ChatWidget, CompletionClient, CompletionRequest, FirmProfile, GeminiClient, OllamaClient};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request(prompt: &str) -> CompletionRequest {
    CompletionRequest {
        model: "gemini-3-flash-preview".to_string(),
        system_instruction: "Suggest a consultation.".to_string(),
        prompt: prompt.to_string(),
    }
}

fn gemini(server: &MockServer) -> GeminiClient {
    GeminiClient::new(&server.uri(), Some("test-key"), Duration::from_secs(5))
}

#[tokio::test]
async fn gemini_sends_persona_and_prompt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-3-flash-preview:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "systemInstruction": { "parts": [{ "text": "Suggest a consultation." }] },
            "contents": [{ "role": "user", "parts": [{ "text": "When is my T1 due?" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": "April 30." }] } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = gemini(&server).complete(&request("When is my T1 due?")).await.unwrap();
    assert_eq!(reply, "April 30.");
}

#[tokio::test]
async fn gemini_error_status_is_reported_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
        .mount(&server)
        .await;

    let err = gemini(&server).complete(&request("hi")).await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("403"), "{message}");
    assert!(message.contains("API key not valid"), "{message}");
}

#[tokio::test]
async fn gemini_malformed_body_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    assert!(gemini(&server).complete(&request("hi")).await.is_err());
}

#[tokio::test]
async fn widget_shows_placeholder_for_blocked_gemini_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        })))
        .mount(&server)
        .await;

    let profile = FirmProfile::by_key("general").unwrap();
    let mut chat = ChatWidget::new(profile, "gemini-3-flash-preview", profile.assistant.persona);
    assert!(chat.send("Can you file for me?", &gemini(&server)).await);

    let reply = &chat.transcript()[1];
    assert_eq!(reply.role, ChatRole::Assistant);
    assert_eq!(reply.content, profile.assistant.empty_reply);
}

#[tokio::test]
async fn widget_turns_server_errors_into_fallback_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let profile = FirmProfile::default_profile();
    let mut chat = ChatWidget::new(profile, "gemini-3-flash-preview", profile.assistant.persona);
    assert!(chat.send("hello", &gemini(&server)).await);

    assert_eq!(chat.transcript().len(), 2);
    assert_eq!(chat.transcript()[1].content, profile.assistant.failure_reply);
    assert!(!chat.is_sending());
}

#[tokio::test]
async fn ollama_sends_system_prompt_and_disables_streaming() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({
            "model": "llama3.2:latest",
            "prompt": "What can I deduct?",
            "system": "Suggest a consultation.",
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "Home office expenses, in some cases.",
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OllamaClient::new(&server.uri(), Duration::from_secs(5));
    let mut req = request("What can I deduct?");
    req.model = "llama3.2:latest".to_string();
    let reply = client.complete(&req).await.unwrap();
    assert_eq!(reply, "Home office expenses, in some cases.");
}

#[tokio::test]
async fn ollama_lists_installed_models() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [{ "name": "llama3.2:latest" }, { "name": "gemma3:latest" }]
        })))
        .mount(&server)
        .await;

    let client = OllamaClient::new(&server.uri(), Duration::from_secs(5));
    assert_eq!(
        client.list_models().await.unwrap(),
        vec!["llama3.2:latest".to_string(), "gemma3:latest".to_string()]
    );
}
