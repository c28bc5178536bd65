//! OpenTelemetry GenAI semantic-convention attributes for a completed stream.

use serde_json::{Value, json};
use std::collections::BTreeMap;

use crate::types::FinalResponse;

/// A named span event with JSON-encoded payload.
#[derive(Debug, Clone, PartialEq)]
pub struct GenAiEvent {
    pub name: &'static str,
    pub attributes: BTreeMap<&'static str, String>,
}

/// Span attributes describing the response.
///
/// Absent values are omitted rather than written as empty strings.
pub fn gen_ai_attributes(response: &FinalResponse) -> BTreeMap<&'static str, Value> {
    let mut attrs = BTreeMap::new();
    attrs.insert("gen_ai.system", json!(response.provider));
    if let Some(model) = &response.model {
        attrs.insert("gen_ai.response.model", json!(model));
    }
    if let Some(id) = &response.id {
        attrs.insert("gen_ai.response.id", json!(id));
    }
    let reasons: Vec<&str> = if response.finish_reasons.is_empty() {
        vec![response.finish_reason.as_str()]
    } else {
        response.finish_reasons.iter().map(|r| r.as_str()).collect()
    };
    attrs.insert("gen_ai.response.finish_reasons", json!(reasons));
    if let Some(input) = response.input_tokens {
        attrs.insert("gen_ai.usage.prompt_tokens", json!(input));
    }
    if let Some(output) = response.output_tokens {
        attrs.insert("gen_ai.usage.completion_tokens", json!(output));
    }
    if let Some(cost) = response.cost {
        attrs.insert("gen_ai.usage.cost", json!(cost));
    }
    attrs
}

/// Prompt and completion events, JSON-encoded the way span exporters expect.
pub fn gen_ai_events(response: &FinalResponse) -> Vec<GenAiEvent> {
    let mut events = Vec::with_capacity(2);
    if let Some(user) = &response.user_message {
        events.push(GenAiEvent {
            name: "gen_ai.content.prompt",
            attributes: BTreeMap::from([("gen_ai.prompt", json!(user).to_string())]),
        });
    }
    events.push(GenAiEvent {
        name: "gen_ai.content.completion",
        attributes: BTreeMap::from([("gen_ai.completion", json!(response.message).to_string())]),
    });
    events
}
