//! End-to-end scenarios over normalized chunks

use chatfold::prelude::*;
use futures_util::stream;
use serde_json::json;
use std::sync::Arc;
use std::sync::Mutex;

fn passthrough(
    items: Vec<Result<Chunk, TransportError>>,
) -> ChatStream<PassthroughAdapter> {
    ChatStream::new(stream::iter(items), PassthroughAdapter::new("test"))
}

#[tokio::test]
async fn text_scenario_builds_hello() {
    let response = passthrough(vec![
        Ok(Chunk::content("Hel")),
        Ok(Chunk::content("lo")),
        Ok(Chunk::new()
            .with_finish_reason(FinishReason::Stop)
            .with_usage(UsageDelta::new(3, 2))),
    ])
    .collect_response()
    .await
    .unwrap();

    assert_eq!(response.content(), Some("Hello"));
    assert_eq!(response.finish_reason, FinishReason::Stop);
    assert_eq!(response.input_tokens, Some(3));
    assert_eq!(response.output_tokens, Some(2));
    assert_eq!(response.message.role, Role::Assistant);
}

#[tokio::test]
async fn tool_call_scenario_reassembles_fragments() {
    let response = passthrough(vec![
        Ok(Chunk::new().with_tool_call(ToolCallDelta::new(0).with_name("get_"))),
        Ok(Chunk::new().with_tool_call(
            ToolCallDelta::new(0)
                .with_name("weather")
                .with_arguments("{\"city\":"),
        )),
        Ok(Chunk::new().with_tool_call(ToolCallDelta::new(0).with_arguments("\"NYC\"}"))),
    ])
    .collect_response()
    .await
    .unwrap();

    let calls = response.tool_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].name, "get_weather");
    assert_eq!(calls[0].arguments, json!({"city": "NYC"}));
    assert_eq!(response.finish_reason, FinishReason::Stop, "defaulted");
}

#[tokio::test]
async fn transport_error_after_two_chunks_keeps_partial_content() {
    let mut chat = passthrough(vec![
        Ok(Chunk::content("first ")),
        Ok(Chunk::content("second")),
        Err(TransportError::timeout("no data for 30s")),
    ]);

    let mut yielded = Vec::new();
    while let Some(item) = chat.next().await {
        yielded.push(item);
    }
    assert_eq!(yielded.len(), 3);
    assert_eq!(
        yielded[2],
        Err(StreamError::Transport(TransportError::timeout(
            "no data for 30s"
        )))
    );
    assert!(!chat.is_complete());
    assert_eq!(chat.state().content(), "first second");
    assert!(matches!(
        chat.into_response(),
        Err(StreamError::Incomplete { .. })
    ));
}

#[tokio::test]
async fn first_seen_slot_order_is_kept() {
    let response = passthrough(vec![
        Ok(Chunk::new().with_tool_call(ToolCallDelta::new(2).with_name("second_index"))),
        Ok(Chunk::new().with_tool_call(ToolCallDelta::new(0).with_name("zero_index"))),
        Ok(Chunk::new().with_tool_call(ToolCallDelta::new(2).with_arguments("{}"))),
    ])
    .collect_response()
    .await
    .unwrap();

    let names: Vec<_> = response.tool_calls().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["second_index", "zero_index"]);
    assert_eq!(response.tool_calls()[1].arguments, json!({}));
}

#[tokio::test]
async fn usage_is_last_write_wins() {
    let response = passthrough(vec![
        Ok(Chunk::content("x").with_usage(UsageDelta::new(10, 5)).with_cost(0.1)),
        Ok(Chunk::new().with_usage(UsageDelta::new(10, 8)).with_cost(0.2)),
    ])
    .collect_response()
    .await
    .unwrap();
    assert_eq!(response.output_tokens, Some(8));
    assert_eq!(response.cost, Some(0.2));
}

#[tokio::test]
async fn incremental_usage_mode_adds_reports() {
    let chat = ChatStream::with_options(
        stream::iter(vec![
            Ok::<_, TransportError>(Chunk::content("x").with_usage(UsageDelta::new(10, 5))),
            Ok(Chunk::new().with_usage(UsageDelta::output(3))),
        ]),
        PassthroughAdapter::new("test"),
        StreamOptions::new().with_usage_mode(UsageMode::Incremental),
    );
    let response = chat.collect_response().await.unwrap();
    assert_eq!(response.input_tokens, Some(10));
    assert_eq!(response.output_tokens, Some(8));
}

#[tokio::test]
async fn empty_stream_cannot_be_built() {
    let err = passthrough(vec![]).collect_response().await.unwrap_err();
    assert_eq!(err, StreamError::EmptyStream);
    assert_eq!(
        StreamAccumulator::new().finish().chunks_consumed(),
        0
    );
}

#[tokio::test]
async fn cancelled_stream_keeps_partial_state() {
    let handle = CancelHandle::new();
    let mut chat = ChatStream::with_options(
        stream::iter(vec![
            Ok::<_, TransportError>(Chunk::content("kept")),
            Ok(Chunk::content(" dropped")),
        ]),
        PassthroughAdapter::new("test"),
        StreamOptions::new().with_cancel_handle(handle.clone()),
    );

    assert!(chat.next().await.is_some());
    handle.cancel();
    assert!(chat.next().await.is_none());
    assert_eq!(chat.state().content(), "kept");
    assert!(matches!(
        chat.response(),
        Err(StreamError::Incomplete { .. })
    ));
}

#[derive(Default)]
struct ContentTap {
    seen: Mutex<Vec<String>>,
}

impl StreamObserver for ContentTap {
    fn on_chunk(&self, _chunk: &Chunk, state: &AccumulatedState) {
        self.seen.lock().unwrap().push(state.content().to_string());
    }
}

#[tokio::test]
async fn observers_see_incremental_state() {
    let tap = Arc::new(ContentTap::default());
    passthrough(vec![Ok(Chunk::content("a")), Ok(Chunk::content("b"))])
        .with_observer(tap.clone())
        .collect_response()
        .await
        .unwrap();
    assert_eq!(*tap.seen.lock().unwrap(), vec!["a", "ab"]);
}
