mod common;

use common::MockServer;
use futures_util::StreamExt;
use openrouter_client::chat::{ChatRequest, Message, Role};
use openrouter_client::response::Choice;
use openrouter_client::{Error, OpenRouterClient, OpenRouterConfig, STREAM_GUARD_MESSAGE};
use serde_json::json;

fn client_for(server: &MockServer) -> OpenRouterClient {
    OpenRouterClient::new(OpenRouterConfig::new("test-key").with_base_url(server.url()))
}

fn chat_request() -> ChatRequest {
    ChatRequest::builder()
        .model("mistralai/mistral-7b-instruct:free")
        .messages(vec![Message::new(Role::User, "Hello")])
        .build()
        .expect("valid request")
}

#[tokio::test]
async fn send_chat_maps_a_message_completion() {
    let body = json!({
        "id": "gen-1",
        "model": "mistralai/mistral-7b-instruct:free",
        "object": "chat.completion",
        "created": 1715621307,
        "choices": [{
            "message": {"role": "assistant", "content": "Hi there!"},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 9, "completion_tokens": 4, "total_tokens": 13}
    });
    let server = MockServer::spawn(200, "application/json", body.to_string()).await;
    let client = client_for(&server);

    let response = client.send_chat(&chat_request()).await.expect("chat response");

    assert_eq!(response.id.as_deref(), Some("gen-1"));
    assert_eq!(response.object.as_deref(), Some("chat.completion"));
    match &response.choices[0] {
        Choice::Message(choice) => {
            assert_eq!(choice.message.content.as_deref(), Some("Hi there!"));
            assert_eq!(choice.finish_reason.as_deref(), Some("stop"));
        }
        other => panic!("expected message choice, got {other:?}"),
    }
    assert_eq!(response.usage.unwrap().total_tokens, Some(13));
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn send_chat_with_stream_flag_returns_guard_error_without_network_call() {
    let server = MockServer::spawn(200, "application/json", "{}").await;
    let client = client_for(&server);

    let request = chat_request().with_stream(true);
    let err = client.send_chat(&request).await.unwrap_err();

    match err {
        Error::Guard(error) => {
            assert_eq!(error.code, 400);
            assert_eq!(error.message, STREAM_GUARD_MESSAGE);
        }
        other => panic!("expected guard error, got {other:?}"),
    }
    assert_eq!(server.hits(), 0, "guard must short-circuit before any I/O");
}

#[tokio::test]
async fn non_2xx_status_maps_to_api_error() {
    let body = json!({"error": {"message": "Insufficient credits", "code": 402}});
    let server = MockServer::spawn(402, "application/json", body.to_string()).await;
    let client = client_for(&server);

    let err = client.send_chat(&chat_request()).await.unwrap_err();
    match err {
        Error::Api(error) => {
            assert_eq!(error.code, 402);
            assert!(error.message.contains("Insufficient credits"));
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn get_cost_maps_the_data_envelope() {
    let body = json!({
        "data": {
            "id": "gen-1",
            "model": "mistralai/mistral-7b-instruct:free",
            "total_cost": 0.00177,
            "origin": "https://example.app",
            "created_at": "2024-05-13T17:24:43.871Z",
            "tokens_prompt": 24,
            "tokens_completion": 9
        }
    });
    let server = MockServer::spawn(200, "application/json", body.to_string()).await;
    let client = client_for(&server);

    let cost = client.get_cost("gen-1").await.expect("cost response");
    assert_eq!(cost.id.as_deref(), Some("gen-1"));
    assert_eq!(cost.total_cost, Some(0.00177));
    assert_eq!(cost.tokens_prompt, Some(24));
    assert!(cost.streamed.is_none());
}

#[tokio::test]
async fn get_rate_limit_maps_the_data_envelope() {
    let body = json!({
        "data": {
            "label": "sk-or-v1-f35...ebd",
            "usage": 0.5,
            "limit_remaining": 9.5,
            "is_free_tier": true,
            "rate_limit": {"requests": 10, "interval": "10s"}
        }
    });
    let server = MockServer::spawn(200, "application/json", body.to_string()).await;
    let client = client_for(&server);

    let limits = client.get_rate_limit().await.expect("limit response");
    assert_eq!(limits.label.as_deref(), Some("sk-or-v1-f35...ebd"));
    assert_eq!(limits.is_free_tier, Some(true));
    assert_eq!(limits.rate_limit.unwrap().requests, Some(10));
}

#[tokio::test]
async fn chat_stream_yields_decoded_chunks_in_order() {
    let sse = concat!(
        "data: {\"id\":\"gen-1\",\"object\":\"chat.completion.chunk\",",
        "\"choices\":[{\"delta\":{\"role\":\"assistant\",\"content\":\"Hel\"}}]}\n\n",
        "data: {\"id\":\"gen-1\",\"object\":\"chat.completion.chunk\",",
        "\"choices\":[{\"delta\":{\"content\":\"lo!\"},\"finish_reason\":\"stop\"}]}\n\n",
        "data: [DONE]\n\n",
    );
    let server = MockServer::spawn(200, "text/event-stream", sse).await;
    let client = client_for(&server);

    let mut stream = client.chat_stream(&chat_request()).await.expect("stream handle");

    let mut contents = Vec::new();
    while let Some(item) = stream.next().await {
        let response = item.expect("stream item");
        assert_eq!(response.object.as_deref(), Some("chat.completion.chunk"));
        if let Choice::Streaming(choice) = &response.choices[0] {
            if let Some(content) = &choice.delta.content {
                contents.push(content.clone());
            }
        }
    }

    assert_eq!(contents, vec!["Hel".to_string(), "lo!".to_string()]);
}

#[tokio::test]
async fn send_chat_stream_returns_the_raw_response_handle() {
    let sse = "data: {\"id\":\"gen-2\"}\n\n";
    let server = MockServer::spawn(200, "text/event-stream", sse).await;
    let client = client_for(&server);

    let response = client
        .send_chat_stream(&chat_request())
        .await
        .expect("streaming response");
    assert!(response.status().is_success());

    // The caller drives reassembly over the raw bytes.
    let mut reassembler = openrouter_client::StreamReassembler::new();
    let body = response.bytes().await.expect("body bytes");
    let decoded = reassembler.push(&String::from_utf8_lossy(&body));
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0].id.as_deref(), Some("gen-2"));
}
