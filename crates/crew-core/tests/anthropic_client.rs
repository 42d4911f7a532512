use crew_core::{
    AgentInvoker, AgentRole, AnthropicClient, ClientConfig, Credential, CrewError, Message,
    MessageRequest, ModelClient, ModelSettings,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> AnthropicClient {
    AnthropicClient::new(
        ClientConfig::default().with_base_url(server.uri()),
        Credential::new("sk-ant-test").unwrap(),
    )
    .unwrap()
}

fn request() -> MessageRequest {
    MessageRequest {
        model: "claude-sonnet-4-20250514".to_string(),
        max_tokens: 1500,
        system: AgentRole::Reviewer.preamble().to_string(),
        messages: vec![Message::user("review this")],
    }
}

#[tokio::test]
async fn sends_credential_version_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "sk-ant-test"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "claude-sonnet-4-20250514",
            "max_tokens": 1500,
            "system": AgentRole::Reviewer.preamble(),
            "messages": [{"role": "user", "content": "review this"}],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "model": "claude-sonnet-4-20250514",
            "content": [{"type": "text", "text": "Score: 8/10"}],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 120, "output_tokens": 9}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server).create_message(&request()).await.unwrap();
    assert_eq!(response.first_text(), Some("Score: 8/10"));
    assert_eq!(response.usage.input_tokens, 120);
}

#[tokio::test]
async fn error_envelope_becomes_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(
            ResponseTemplate::new(401)
                .insert_header("request-id", "req_abc")
                .set_body_json(json!({
                    "type": "error",
                    "error": {"type": "authentication_error", "message": "invalid x-api-key"}
                })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).create_message(&request()).await.unwrap_err();
    match err {
        CrewError::Provider(p) => {
            assert_eq!(p.status, 401);
            assert_eq!(p.error_type, "authentication_error");
            assert_eq!(p.message, "invalid x-api-key");
            assert_eq!(p.request_id.as_deref(), Some("req_abc"));
        }
        other => panic!("expected provider error, got {other:?}"),
    }
}

#[tokio::test]
async fn overloaded_plain_body_is_still_a_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(529).set_body_string("Overloaded"))
        .mount(&server)
        .await;

    let err = client_for(&server).create_message(&request()).await.unwrap_err();
    assert!(matches!(err, CrewError::Provider(ref p) if p.status == 529 && p.message == "Overloaded"));
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn unreachable_endpoint_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = AnthropicClient::new(
        ClientConfig::default().with_base_url(uri),
        Credential::new("sk-ant-test").unwrap(),
    )
    .unwrap();

    let err = client.create_message(&request()).await.unwrap_err();
    assert!(matches!(err, CrewError::Transport(_)));
}

#[tokio::test]
async fn invoker_over_http_uses_configured_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_partial_json(json!({"model": "claude-custom", "max_tokens": 256})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg_02",
            "model": "claude-custom",
            "content": [{"type": "text", "text": "ideas"}],
            "stop_reason": "max_tokens",
            "usage": {"input_tokens": 1, "output_tokens": 256}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let invoker = AgentInvoker::new(
        client_for(&server),
        ModelSettings::new("claude-custom", 256).unwrap(),
    );
    let exchange = invoker.invoke(AgentRole::Ideator, "go").await.unwrap();
    assert_eq!(exchange.text(), "ideas");
    assert_eq!(exchange.model(), "claude-custom");
    assert!(exchange.truncated());
}
