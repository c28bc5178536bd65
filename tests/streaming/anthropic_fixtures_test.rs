//! Anthropic streaming fixtures tests

use chatfold::providers::anthropic::AnthropicChunkAdapter;
use chatfold::streaming::StreamOptions;
use chatfold::types::FinishReason;
use chatfold::{ErrorCategory, StreamError};
use serde_json::json;

use crate::support;

#[tokio::test]
async fn anthropic_message_start_deltas_stop_fixture() {
    let mut stream = support::fixture_stream(
        "tests/fixtures/anthropic/message_start_deltas_stop.sse",
        AnthropicChunkAdapter::new(),
        StreamOptions::new(),
    );

    let items = support::drain(&mut stream).await;
    assert_eq!(items.len(), 8, "one chunk per event, ping included");
    assert_eq!(stream.state().chunks_consumed(), 8);

    let response = stream.into_response().expect("build response");
    assert_eq!(response.content(), Some("Hello world"));
    assert_eq!(response.finish_reason, FinishReason::Stop);
    assert_eq!(response.id.as_deref(), Some("msg_01XFDUDYJgAACzvnptvVoYEL"));
    assert_eq!(response.model.as_deref(), Some("claude-3-5-sonnet-20241022"));
    assert_eq!(response.input_tokens, Some(10));
    assert_eq!(response.output_tokens, Some(2));
    assert_eq!(response.cost, None);
}

#[tokio::test]
async fn anthropic_tool_use_fixture() {
    let stream = support::fixture_stream(
        "tests/fixtures/anthropic/tool_use.sse",
        AnthropicChunkAdapter::new(),
        StreamOptions::new(),
    );

    let response = stream.collect_response().await.expect("build response");
    assert_eq!(response.content(), Some("Let me check the weather."));
    assert_eq!(response.finish_reason, FinishReason::ToolCalls);
    assert_eq!(response.input_tokens, Some(472));
    assert_eq!(response.output_tokens, Some(89));

    let calls = response.tool_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].id.as_deref(), Some("toolu_01T1x1fJ34qAmk2tNTrN7Up6"));
    assert_eq!(calls[0].name, "get_weather");
    assert_eq!(calls[0].arguments, json!({"city": "San Francisco"}));
}

#[tokio::test]
async fn anthropic_thinking_and_text_fixture() {
    let stream = support::fixture_stream(
        "tests/fixtures/anthropic/thinking_and_text.sse",
        AnthropicChunkAdapter::new(),
        StreamOptions::new(),
    );

    let response = stream.collect_response().await.expect("build response");
    assert_eq!(response.content(), Some("Answer: 42"));
    assert_eq!(response.finish_reason, FinishReason::Length);
    assert!(response.tool_calls().is_empty());
}

#[tokio::test]
async fn anthropic_error_event_fixture() {
    let mut stream = support::fixture_stream(
        "tests/fixtures/anthropic/error_event.sse",
        AnthropicChunkAdapter::new(),
        StreamOptions::new(),
    );

    let items = support::drain(&mut stream).await;
    let err = items
        .last()
        .expect("items")
        .as_ref()
        .expect_err("error event");
    assert_eq!(err.category(), ErrorCategory::Provider);
    assert!(err.is_retryable(), "overloaded errors are retryable");
    assert!(err.to_string().contains("Overloaded"));

    let state = stream.into_state();
    assert_eq!(state.content(), "Hal");
    assert_eq!(state.input_tokens(), Some(12));
    assert!(!matches!(err, StreamError::MalformedChunk { .. }));
}

#[tokio::test]
async fn anthropic_unknown_event_fixture() {
    let mut stream = support::fixture_stream(
        "tests/fixtures/anthropic/unknown_event.sse",
        AnthropicChunkAdapter::new(),
        StreamOptions::new(),
    );

    let items = support::drain(&mut stream).await;
    assert_eq!(items.len(), 5, "four chunks, then the error");
    assert!(items[..4].iter().all(Result::is_ok));
    match items[4].as_ref().unwrap_err() {
        StreamError::MalformedChunk { provider, message } => {
            assert_eq!(provider, "anthropic");
            assert!(message.contains("mystery"));
        }
        other => panic!("expected a malformed chunk, got {other:?}"),
    }

    assert!(!stream.is_complete());
    assert_eq!(stream.state().chunks_consumed(), 4);
    assert_eq!(stream.state().content(), "Hello");
    assert!(stream.state().finish_reasons().is_empty(), "message_delta never folded");
    assert!(matches!(
        stream.into_response(),
        Err(StreamError::Incomplete { .. })
    ));
}
