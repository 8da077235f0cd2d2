// Provider client tests against a mock chat-completions endpoint

use nl2formula::config::ProviderConfig;
use nl2formula::error::GateError;
use nl2formula::gate::Generator;
use nl2formula::provider::OpenAiClient;

fn test_provider_config(base_url: String) -> ProviderConfig {
    ProviderConfig {
        api_base_url: base_url,
        api_key: Some("sk-test".to_string()),
        timeout_seconds: 5,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_generate_returns_completion_text() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"choices":[{"message":{"role":"assistant","content":"=SUM(B:B)\n합계를 계산합니다"}}]}"#,
        )
        .create_async()
        .await;

    let client = OpenAiClient::new(&test_provider_config(server.url())).unwrap();
    let text = client.generate("prompt").await.unwrap();

    assert_eq!(text, "=SUM(B:B)\n합계를 계산합니다");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_generate_surfaces_api_error_message() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(429)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":{"message":"Rate limit reached for requests","type":"requests"}}"#)
        .create_async()
        .await;

    let client = OpenAiClient::new(&test_provider_config(server.url())).unwrap();
    let err = client.generate("prompt").await.unwrap_err();

    match err {
        GateError::Provider(message) => {
            assert!(message.contains("429"));
            assert!(message.contains("Rate limit reached"));
        }
        other => panic!("expected Provider error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_generate_rejects_empty_choices() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[]}"#)
        .create_async()
        .await;

    let client = OpenAiClient::new(&test_provider_config(server.url())).unwrap();
    let err = client.generate("prompt").await.unwrap_err();
    assert!(matches!(err, GateError::Provider(_)));
}

#[tokio::test]
async fn test_generate_rejects_malformed_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("not json at all")
        .create_async()
        .await;

    let client = OpenAiClient::new(&test_provider_config(server.url())).unwrap();
    let err = client.generate("prompt").await.unwrap_err();
    assert!(matches!(err, GateError::Provider(_)));
}
