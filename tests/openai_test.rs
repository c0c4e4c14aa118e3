//! Wiremock tests for the OpenAI-compatible client.

mod common;

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::valid_myth_json;
use mythweaver::{MythError, MythService, ScenarioRequest};
use mythweaver::providers::{CompletionProvider, CompletionRequest, ModerationProvider, OpenAiClient};

fn client(server: &MockServer) -> OpenAiClient {
    OpenAiClient::with_base_url("test-key", server.uri()).unwrap()
}

fn chat_reply(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 10, "completion_tokens": 20, "total_tokens": 30}
    })
}

// ============================================================================
// Chat completions
// ============================================================================

#[tokio::test]
async fn completion_sends_expected_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "max_tokens": 1200,
            "messages": [
                {"role": "system", "content": "be mythic"},
                {"role": "user", "content": "the prompt"}
            ],
            "response_format": {"type": "json_object"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("{\"ok\":true}")))
        .expect(1)
        .mount(&server)
        .await;

    let request = CompletionRequest::new("be mythic", "the prompt", "gpt-4o-mini");
    let content = client(&server).complete(&request).await.unwrap();
    assert_eq!(content, "{\"ok\":true}");
}

#[tokio::test]
async fn json_mode_off_omits_response_format() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("plain text")))
        .mount(&server)
        .await;

    let request = CompletionRequest::new("s", "p", "m").json_mode(false);
    client(&server).complete(&request).await.unwrap();

    let received = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    assert!(body.get("response_format").is_none());
}

#[tokio::test]
async fn api_error_carries_status_and_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
        })))
        .mount(&server)
        .await;

    let request = CompletionRequest::new("s", "p", "m");
    let err = client(&server).complete(&request).await.unwrap_err();
    match err {
        MythError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Incorrect API key provided");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn api_error_without_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let request = CompletionRequest::new("s", "p", "m");
    let err = client(&server).complete(&request).await.unwrap_err();
    assert!(matches!(err, MythError::Api { status: 502, .. }));
    assert!(err.is_transport());
}

#[tokio::test]
async fn missing_choices_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let request = CompletionRequest::new("s", "p", "m");
    let err = client(&server).complete(&request).await.unwrap_err();
    assert!(matches!(err, MythError::EmptyResponse));
}

#[tokio::test]
async fn null_content_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"choices": [{"message": {"content": null}}]})),
        )
        .mount(&server)
        .await;

    let request = CompletionRequest::new("s", "p", "m");
    let err = client(&server).complete(&request).await.unwrap_err();
    assert!(matches!(err, MythError::EmptyResponse));
}

#[tokio::test]
async fn blank_content_is_returned_for_parsing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("  ")))
        .mount(&server)
        .await;

    let request = CompletionRequest::new("s", "p", "m");
    let content = client(&server).complete(&request).await.unwrap();
    assert_eq!(content, "  ");
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_ignored() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("hi")))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenAiClient::with_base_url("k", format!("{}/", server.uri())).unwrap();
    let request = CompletionRequest::new("s", "p", "m");
    assert_eq!(client.complete(&request).await.unwrap(), "hi");
}

// ============================================================================
// Moderation
// ============================================================================

#[tokio::test]
async fn moderation_verdicts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/moderations"))
        .and(body_partial_json(json!({"input": "something awful"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "modr-1",
            "results": [{"flagged": true, "categories": {"violence": true}}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/moderations"))
        .and(body_partial_json(json!({"input": "a pleasant picnic"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "modr-2",
            "results": [{"flagged": false}]
        })))
        .mount(&server)
        .await;

    let client = client(&server);
    assert!(client.is_flagged("something awful").await.unwrap());
    assert!(!client.is_flagged("a pleasant picnic").await.unwrap());
}

#[tokio::test]
async fn moderation_server_error_is_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/moderations"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client(&server).is_flagged("text").await.unwrap_err();
    assert!(err.is_transport());
}

// ============================================================================
// Through the service
// ============================================================================

#[tokio::test]
async fn empty_first_reply_is_retried_by_the_service() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("")))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(&valid_myth_json())))
        .expect(1)
        .mount(&server)
        .await;

    let service = MythService::builder()
        .completion(Arc::new(client(&server)))
        .build()
        .unwrap();

    let artifact = service
        .generate(ScenarioRequest::new("My coworker keeps stealing my lunch from the fridge"))
        .await
        .unwrap();
    assert!(!artifact.is_fallback());
    assert_eq!(artifact.title, "The Thief of the Cold Hearth");
}
