//! Gemini client and summarizer tests against a mock Generative Language API.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use membit::MembitError;
use membit::ai::{GeminiClient, GenerationConfig, Summarizer};

const MODEL_PATH: &str = "/v1beta/models/gemini-flash-latest:generateContent";

fn summarizer_for(server: &MockServer) -> Summarizer {
    Summarizer::new(Arc::new(GeminiClient::with_base_url(
        "test-key",
        "gemini-flash-latest",
        server.uri(),
    )))
}

#[tokio::test]
async fn returns_first_candidate_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{"role": "user", "parts": [{"text": "hello"}]}],
            "generationConfig": {"maxOutputTokens": 42}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [
                {"content": {"parts": [{"text": "Positive"}, {"text": " overall."}]}, "finishReason": "STOP"},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = summarizer_for(&server)
        .call_gemini_safe("hello", 42)
        .await
        .unwrap();
    assert_eq!(text, "Positive overall.");
}

#[tokio::test]
async fn no_candidates_is_blocked_or_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        })))
        .mount(&server)
        .await;

    let err = summarizer_for(&server)
        .call_gemini_safe("something unsafe", 180)
        .await
        .unwrap_err();
    assert!(matches!(err, MembitError::BlockedOrEmpty));
    assert_eq!(err.to_string(), "Blocked/Empty");
}

#[tokio::test]
async fn raw_client_reports_block_reason() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [],
            "promptFeedback": {"blockReason": "SAFETY"}
        })))
        .mount(&server)
        .await;

    let client = GeminiClient::with_base_url("k", "gemini-flash-latest", server.uri());
    let generation = client
        .generate_content("x", &GenerationConfig::default())
        .await
        .unwrap();
    assert!(generation.candidates.is_empty());
    assert_eq!(generation.block_reason.as_deref(), Some("SAFETY"));
}

#[tokio::test]
async fn api_error_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}
        })))
        .mount(&server)
        .await;

    let err = summarizer_for(&server)
        .call_gemini_safe("hello", 180)
        .await
        .unwrap_err();
    assert!(matches!(err, MembitError::Ai(_)));
    assert!(err.to_string().contains("API key not valid"));
}

#[tokio::test]
async fn candidate_without_text_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"finishReason": "MAX_TOKENS"}]
        })))
        .mount(&server)
        .await;

    let err = summarizer_for(&server)
        .call_gemini_safe("hello", 1)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("MAX_TOKENS"));
}

#[tokio::test]
async fn uninitialized_summarizer_never_calls_out() {
    let err = Summarizer::uninitialized()
        .call_gemini_safe("hello", 180)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "AI Not Initialized");
}
