use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::models::chat::ToolCall;

/// Chat-completion response.
///
/// Every field is optional because the API may omit fields depending on
/// provider and model, and the mapper must tolerate a missing body entirely.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Request id, later usable for a cost lookup.
    pub id: Option<String>,
    /// e.g. "mistralai/mistral-7b-instruct:free"
    pub model: Option<String>,
    /// "chat.completion" | "chat.completion.chunk"
    pub object: Option<String>,
    /// Unix timestamp.
    pub created: Option<i64>,
    /// Upstream provider, e.g. "HuggingFace".
    pub provider: Option<String>,
    /// Citations, returned by some providers (e.g. Perplexity Sonar).
    pub citations: Option<Vec<String>>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

/// A single response choice.
///
/// The wire format carries no discriminator; the shape depends on whether
/// the request was a prompt completion, a message chat, or a stream. The
/// mapper selects the variant by inspecting which key is present, with
/// `Unknown` as the forward-compatibility fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Choice {
    /// Prompt (non-chat) completion: carries a `text` key.
    NonChat(NonChatChoice),
    /// Full message completion: carries a `message` key.
    Message(MessageChoice),
    /// Streaming chunk: carries a `delta` key.
    Streaming(StreamingChoice),
    /// Unrecognized shape, kept verbatim.
    Unknown(serde_json::Value),
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonChatChoice {
    pub text: String,
    #[serde(default)]
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub error: Option<ErrorData>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageChoice {
    pub message: ResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub error: Option<ErrorData>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamingChoice {
    pub delta: Delta,
    #[serde(default)]
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub error: Option<ErrorData>,
}

/// Assistant message in a non-streaming choice.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub refusal: Option<String>,
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCall>>,
}

/// Incremental message fields in a streaming choice.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Delta {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub refusal: Option<String>,
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCall>>,
}

/// Token counts and credit usage for one request.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: Option<u64>,
    pub completion_tokens: Option<u64>,
    pub total_tokens: Option<u64>,
    pub cost: Option<f64>,
}

/// Error payload, also used for the streaming-guard result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorData {
    /// e.g. 400, 408, 429
    pub code: u16,
    pub message: String,
}

/// Cost and statistics for a generation, from `GET generation?id=...`.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostResponse {
    pub id: Option<String>,
    pub model: Option<String>,
    pub total_cost: Option<f64>,
    pub origin: Option<String>,
    pub created_at: Option<String>,
    pub streamed: Option<bool>,
    pub cancelled: Option<bool>,
    pub finish_reason: Option<String>,
    pub generation_time: Option<i64>,
    pub provider_name: Option<String>,
    pub tokens_prompt: Option<i64>,
    pub tokens_completion: Option<i64>,
    pub native_tokens_prompt: Option<i64>,
    pub native_tokens_completion: Option<i64>,
    pub num_media_prompt: Option<i64>,
    pub num_media_completion: Option<i64>,
    pub app_id: Option<i64>,
    /// Milliseconds.
    pub latency: Option<i64>,
    /// Milliseconds.
    pub moderation_latency: Option<i64>,
    pub upstream_id: Option<String>,
    pub usage: Option<f64>,
}

/// Requests-per-interval window, e.g. `{ "requests": 10, "interval": "10s" }`.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateLimit {
    pub requests: Option<i64>,
    pub interval: Option<String>,
}

/// Rate limit and credits left on an API key, from `GET auth/key`.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateLimitResponse {
    /// Key label, e.g. "sk-or-v1-f35...ebd".
    pub label: Option<String>,
    /// Credits used.
    pub usage: Option<f64>,
    pub limit_remaining: Option<f64>,
    /// Credit limit for the key, absent if unlimited.
    pub limit: Option<f64>,
    pub is_free_tier: Option<bool>,
    pub rate_limit: Option<RateLimit>,
}
