//! Groq streaming fixtures tests

use chatfold::providers::groq::GroqChunkAdapter;
use chatfold::streaming::{StreamOptions, ToolCallPolicy};
use chatfold::types::FinishReason;
use chatfold::StreamError;
use serde_json::json;

use crate::support;

#[tokio::test]
async fn groq_text_with_x_groq_usage_fixture() {
    let stream = support::fixture_stream(
        "tests/fixtures/groq/text_with_x_groq.sse",
        GroqChunkAdapter::new(),
        StreamOptions::new(),
    );

    let response = stream.collect_response().await.expect("build response");
    assert_eq!(response.provider, "groq");
    assert_eq!(response.content(), Some("Fast inference"));
    assert_eq!(response.finish_reason, FinishReason::Stop);
    assert_eq!(response.input_tokens, Some(20));
    assert_eq!(response.output_tokens, Some(10));
    assert!(response.cost.is_some());
}

#[tokio::test]
async fn groq_invalid_tool_arguments_are_reported_not_fatal() {
    let stream = support::fixture_stream(
        "tests/fixtures/groq/invalid_tool_args.sse",
        GroqChunkAdapter::new(),
        StreamOptions::new(),
    );

    let response = stream.collect_response().await.expect("partial policy");
    assert_eq!(response.tool_calls().len(), 1);
    assert_eq!(response.tool_calls()[0].id.as_deref(), Some("call_ok"));
    assert_eq!(response.tool_calls()[0].arguments, json!({"q": "rust"}));

    assert_eq!(response.invalid_tool_calls.len(), 1);
    let invalid = &response.invalid_tool_calls[0];
    assert_eq!(invalid.index, 1);
    assert_eq!(invalid.id.as_deref(), Some("call_bad"));
    assert_eq!(invalid.raw_arguments, "{\"q\": ");
}

#[tokio::test]
async fn groq_strict_override_fails_the_build() {
    let stream = support::fixture_stream(
        "tests/fixtures/groq/invalid_tool_args.sse",
        GroqChunkAdapter::new(),
        StreamOptions::new().with_tool_call_policy(ToolCallPolicy::Strict),
    );

    let err = stream.collect_response().await.unwrap_err();
    match err {
        StreamError::ToolCallArguments(detail) => {
            assert_eq!(detail.index, 1);
            assert_eq!(detail.name, "lookup");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
