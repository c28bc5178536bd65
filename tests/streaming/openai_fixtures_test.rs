//! OpenAI streaming fixtures tests

use chatfold::providers::openai::OpenAiChunkAdapter;
use chatfold::streaming::StreamOptions;
use chatfold::types::{FinishReason, UserMessage};
use chatfold::{StreamError, TransportErrorKind};
use serde_json::json;

use crate::support;

#[tokio::test]
async fn openai_text_with_usage_fixture() {
    let mut stream = support::fixture_stream(
        "tests/fixtures/openai/text_with_usage.sse",
        OpenAiChunkAdapter::new(),
        StreamOptions::new().with_user_message(UserMessage::text("Say hello")),
    );

    let items = support::drain(&mut stream).await;
    assert_eq!(items.len(), 5, "[DONE] is not a chunk");
    assert!(items.iter().all(Result::is_ok));

    let response = stream.into_response().expect("build response");
    assert_eq!(response.provider, "openai");
    assert_eq!(response.content(), Some("Hello world"));
    assert_eq!(response.finish_reason, FinishReason::Stop);
    assert_eq!(response.id.as_deref(), Some("chatcmpl-9xA1"));
    assert_eq!(response.model.as_deref(), Some("gpt-4o-mini-2024-07-18"));
    assert_eq!(response.input_tokens, Some(9));
    assert_eq!(response.output_tokens, Some(2));
    assert_eq!(response.total_tokens(), Some(11));
    let cost = response.cost.expect("priced model");
    assert!((cost - (9.0 * 0.15 + 2.0 * 0.60) / 1_000_000.0).abs() < 1e-15);
    assert_eq!(response.user_message, Some(UserMessage::text("Say hello")));
    assert!(response.tool_calls().is_empty());
}

#[tokio::test]
async fn openai_parallel_tool_calls_fixture() {
    let stream = support::fixture_stream(
        "tests/fixtures/openai/parallel_tool_calls.sse",
        OpenAiChunkAdapter::new(),
        StreamOptions::new(),
    );

    let response = stream.collect_response().await.expect("build response");
    assert_eq!(response.finish_reason, FinishReason::ToolCalls);
    // Tool calls without text still yield `Some("")`.
    assert_eq!(response.content(), Some(""));

    let calls = response.tool_calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].id.as_deref(), Some("call_paris"));
    assert_eq!(calls[0].name, "get_weather");
    assert_eq!(calls[0].arguments, json!({"city": "Paris"}));
    assert_eq!(calls[1].id.as_deref(), Some("call_tokyo"));
    assert_eq!(calls[1].arguments, json!({"city": "Tokyo"}));
    assert_eq!(response.cost, None, "no usage reported");
}

#[tokio::test]
async fn openai_error_mid_stream_fixture() {
    let mut stream = support::fixture_stream(
        "tests/fixtures/openai/error_mid_stream.sse",
        OpenAiChunkAdapter::new(),
        StreamOptions::new(),
    );

    let items = support::drain(&mut stream).await;
    assert_eq!(items.len(), 3, "stream ends at the error");
    let err = items[2].as_ref().unwrap_err();
    assert_eq!(
        err.as_transport().map(|t| &t.kind),
        Some(&TransportErrorKind::Provider)
    );
    assert!(err.to_string().contains("server_error"));

    assert_eq!(stream.state().content(), "Partial");
    assert!(matches!(
        stream.into_response(),
        Err(StreamError::Incomplete { .. })
    ));
}

#[tokio::test]
async fn openai_garbled_payload_fixture() {
    let mut stream = support::fixture_stream(
        "tests/fixtures/openai/garbled_payload.sse",
        OpenAiChunkAdapter::new(),
        StreamOptions::new(),
    );

    let items = support::drain(&mut stream).await;
    assert_eq!(items.len(), 3, "stream ends at the undecodable payload");
    match items[2].as_ref().unwrap_err() {
        StreamError::MalformedChunk { provider, .. } => assert_eq!(provider, "openai"),
        other => panic!("expected a malformed chunk, got {other:?}"),
    }
    assert!(!items[2].as_ref().unwrap_err().is_retryable());

    assert_eq!(stream.state().content(), "Hello");
    assert_eq!(stream.state().chunks_consumed(), 2);
    assert!(matches!(
        stream.into_response(),
        Err(StreamError::Incomplete { .. })
    ));
}
