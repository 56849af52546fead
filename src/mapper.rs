//! Lossy conversion from decoded JSON values into typed response objects.
//!
//! All functions here are pure and tolerate missing input: any field absent
//! from the payload stays unset, and a `None` body yields a response with
//! every field unset. The API omits optional fields depending on provider
//! and model, so absence is never an error at this layer.

use serde_json::Value;

use crate::models::response::{
    ChatResponse, Choice, CostResponse, RateLimit, RateLimitResponse, Usage,
};

/// Walk a dot-separated path, e.g. `data.total_cost`.
fn at<'a>(value: Option<&'a Value>, path: &str) -> Option<&'a Value> {
    let mut current = value?;
    for key in path.split('.') {
        current = current.get(key)?;
    }
    Some(current)
}

fn string_at(value: Option<&Value>, path: &str) -> Option<String> {
    at(value, path).and_then(Value::as_str).map(str::to_string)
}

fn i64_at(value: Option<&Value>, path: &str) -> Option<i64> {
    at(value, path).and_then(Value::as_i64)
}

fn u64_at(value: Option<&Value>, path: &str) -> Option<u64> {
    at(value, path).and_then(Value::as_u64)
}

fn f64_at(value: Option<&Value>, path: &str) -> Option<f64> {
    at(value, path).and_then(Value::as_f64)
}

fn bool_at(value: Option<&Value>, path: &str) -> Option<bool> {
    at(value, path).and_then(Value::as_bool)
}

/// Select the [`Choice`] variant by inspecting which key is present.
///
/// The wire format has no explicit tag: a prompt completion carries `text`,
/// a chat completion carries `message`, a streaming chunk carries `delta`.
/// Anything else (or a recognized key with an unexpected shape) falls back
/// to `Choice::Unknown` so new upstream shapes never break decoding.
pub fn choice(value: &Value) -> Choice {
    let keyed = |key: &str| value.get(key).is_some();

    let decoded = if keyed("text") {
        serde_json::from_value(value.clone()).map(Choice::NonChat)
    } else if keyed("message") {
        serde_json::from_value(value.clone()).map(Choice::Message)
    } else if keyed("delta") {
        serde_json::from_value(value.clone()).map(Choice::Streaming)
    } else {
        return Choice::Unknown(value.clone());
    };

    decoded.unwrap_or_else(|_| Choice::Unknown(value.clone()))
}

/// Map a decoded chat-completion body (or `None`) to a [`ChatResponse`].
pub fn chat_response(value: Option<&Value>) -> ChatResponse {
    let usage = at(value, "usage").map(|u| Usage {
        prompt_tokens: u64_at(Some(u), "prompt_tokens"),
        completion_tokens: u64_at(Some(u), "completion_tokens"),
        total_tokens: u64_at(Some(u), "total_tokens"),
        cost: f64_at(Some(u), "cost"),
    });

    let citations = at(value, "citations").and_then(Value::as_array).map(|arr| {
        arr.iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    });

    let choices = at(value, "choices")
        .and_then(Value::as_array)
        .map(|arr| arr.iter().map(choice).collect())
        .unwrap_or_default();

    ChatResponse {
        id: string_at(value, "id"),
        model: string_at(value, "model"),
        object: string_at(value, "object"),
        created: i64_at(value, "created"),
        provider: string_at(value, "provider"),
        citations,
        choices,
        usage,
    }
}

/// Map a decoded cost-lookup body (or `None`) to a [`CostResponse`].
///
/// The endpoint wraps its record in a `data` envelope.
pub fn cost_response(value: Option<&Value>) -> CostResponse {
    CostResponse {
        id: string_at(value, "data.id"),
        model: string_at(value, "data.model"),
        total_cost: f64_at(value, "data.total_cost"),
        origin: string_at(value, "data.origin"),
        created_at: string_at(value, "data.created_at"),
        streamed: bool_at(value, "data.streamed"),
        cancelled: bool_at(value, "data.cancelled"),
        finish_reason: string_at(value, "data.finish_reason"),
        generation_time: i64_at(value, "data.generation_time"),
        provider_name: string_at(value, "data.provider_name"),
        tokens_prompt: i64_at(value, "data.tokens_prompt"),
        tokens_completion: i64_at(value, "data.tokens_completion"),
        native_tokens_prompt: i64_at(value, "data.native_tokens_prompt"),
        native_tokens_completion: i64_at(value, "data.native_tokens_completion"),
        num_media_prompt: i64_at(value, "data.num_media_prompt"),
        num_media_completion: i64_at(value, "data.num_media_completion"),
        app_id: i64_at(value, "data.app_id"),
        latency: i64_at(value, "data.latency"),
        moderation_latency: i64_at(value, "data.moderation_latency"),
        upstream_id: string_at(value, "data.upstream_id"),
        usage: f64_at(value, "data.usage"),
    }
}

/// Map a decoded key-limit body (or `None`) to a [`RateLimitResponse`].
pub fn rate_limit_response(value: Option<&Value>) -> RateLimitResponse {
    let rate_limit = at(value, "data.rate_limit").map(|rl| RateLimit {
        requests: i64_at(Some(rl), "requests"),
        interval: string_at(Some(rl), "interval"),
    });

    RateLimitResponse {
        label: string_at(value, "data.label"),
        usage: f64_at(value, "data.usage"),
        limit_remaining: f64_at(value, "data.limit_remaining"),
        limit: f64_at(value, "data.limit"),
        is_free_tier: bool_at(value, "data.is_free_tier"),
        rate_limit,
    }
}
