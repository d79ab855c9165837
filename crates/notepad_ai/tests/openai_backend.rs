use notepad_ai::{AiConfig, AiError, CompletionBackend, OpenAiBackend};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_for(server: &MockServer) -> OpenAiBackend {
    let config = AiConfig::new("sk-test")
        .with_base_url(format!("{}/v1", server.uri()))
        .with_model("test-model");
    OpenAiBackend::new(config).unwrap()
}

#[tokio::test]
async fn complete_posts_chat_request_and_returns_first_choice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "max_tokens": 50,
            "messages": [{"role": "user", "content": "hello"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Hi there"}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = backend_for(&server).complete("hello", 50).await.unwrap();
    assert_eq!(text, "Hi there");
}

#[tokio::test]
async fn non_success_status_maps_to_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"message": "Rate limit exceeded", "type": "requests"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = backend_for(&server).complete("hello", 50).await.unwrap_err();
    match err {
        AiError::Upstream { status, message } => {
            assert_eq!(status, 429);
            assert_eq!(message, "Rate limit exceeded");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn empty_choices_are_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = backend_for(&server).complete("hello", 50).await.unwrap_err();
    assert!(matches!(err, AiError::InvalidResponse(_)));
}
