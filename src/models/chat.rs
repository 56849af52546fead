use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::collections::HashMap;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Chat role enumeration.
///
/// Lowercase serialization to match the OpenRouter API:
/// "system" | "user" | "assistant" | "tool" | "function"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
    /// Legacy alias still present in some payloads.
    Function,
}

/// Message content: either a plain string or an ordered list of typed parts
/// (multimodal input).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl From<&str> for MessageContent {
    fn from(s: &str) -> Self {
        MessageContent::Text(s.to_string())
    }
}

impl From<String> for MessageContent {
    fn from(s: String) -> Self {
        MessageContent::Text(s)
    }
}

/// A typed content part, discriminated by its `type` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
    InputAudio { input_audio: InputAudio },
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    /// URL or base64-encoded image data.
    pub url: String,
    /// Detail level hint, e.g. "auto".
    #[serde(default)]
    pub detail: Option<String>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputAudio {
    /// Base64-encoded audio data.
    pub data: String,
    #[serde(default)]
    pub format: Option<AudioFormat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Mp3,
    Wav,
}

/// A single conversation message.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
    /// Optional participant name to differentiate same-role speakers.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCall>>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<MessageContent>) -> Self {
        Self {
            role,
            content: content.into(),
            name: None,
            tool_calls: None,
        }
    }
}

/// A tool invocation reference, e.g.
/// `{"type": "function", "function": {"name": "my_function"}}`.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub function: Option<FunctionData>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionData {
    pub name: String,
    /// JSON-encoded call arguments.
    #[serde(default)]
    pub arguments: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// JSON Schema for the function parameters.
    #[serde(default)]
    pub parameters: Option<serde_json::Value>,
}

/// Tool definition passed in the request `tools` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolDefinition {
    Function { function: FunctionData },
}

/// `tool_choice` mode keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoiceMode {
    Auto,
    None,
}

impl FromStr for ToolChoiceMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "auto" => Ok(ToolChoiceMode::Auto),
            "none" => Ok(ToolChoiceMode::None),
            other => Err(not_allowed(other, &["auto", "none"])),
        }
    }
}

/// `tool_choice` value: a mode keyword or a structured tool selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolChoice {
    Mode(ToolChoiceMode),
    Selection(ToolCall),
}

/// Model routing strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Fallback,
}

impl FromStr for Route {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fallback" => Ok(Route::Fallback),
            other => Err(not_allowed(other, &["fallback"])),
        }
    }
}

/// Provider data-collection policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataCollection {
    Allow,
    Deny,
}

impl FromStr for DataCollection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "allow" => Ok(DataCollection::Allow),
            "deny" => Ok(DataCollection::Deny),
            other => Err(not_allowed(other, &["allow", "deny"])),
        }
    }
}

/// Reasoning effort level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    High,
    Medium,
    Low,
}

impl FromStr for Effort {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "high" => Ok(Effort::High),
            "medium" => Ok(Effort::Medium),
            "low" => Ok(Effort::Low),
            other => Err(not_allowed(other, &["high", "medium", "low"])),
        }
    }
}

fn not_allowed(value: &str, allowed: &[&str]) -> Error {
    Error::Validation(format!(
        "value is not allowed: {value} - allowed values: {}",
        allowed.join(", ")
    ))
}

/// Provider routing preferences.
///
/// See "Provider Routing" in the OpenRouter docs.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderPreferences {
    #[serde(default)]
    pub allow_fallbacks: Option<bool>,
    #[serde(default)]
    pub require_parameters: Option<bool>,
    #[serde(default)]
    pub data_collection: Option<DataCollection>,
    /// Ordered list of preferred provider names.
    #[serde(default)]
    pub order: Option<Vec<String>>,
}

/// Reasoning-token settings.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reasoning {
    #[serde(default)]
    pub effort: Option<Effort>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub exclude: Option<bool>,
    #[serde(default)]
    pub enabled: Option<bool>,
}

/// Structured-output constraint, e.g. `{"type": "json_object"}`.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub json_schema: Option<serde_json::Value>,
}

/// Usage-accounting switch; serialized as `{"include": true}` when enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageAccounting {
    pub include: bool,
}

/// A validated chat-completion request.
///
/// Instances only come out of [`ChatRequest::builder`], which enforces the
/// two XOR invariants (`messages`/`prompt` and `model`/`models`) at build
/// time, so a `ChatRequest` never exists in an invalid state. `None` fields
/// are omitted from the serialized JSON recursively; the API misbehaves on
/// explicit nulls for some optional parameters.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    messages: Option<Vec<Message>>,
    prompt: Option<String>,
    model: Option<String>,
    /// Fallback model list, tried in order when the primary is unavailable.
    models: Option<Vec<String>>,
    response_format: Option<ResponseFormat>,
    usage: Option<UsageAccounting>,
    /// Single stop sequence or a list of them.
    stop: Option<serde_json::Value>,
    stream: Option<bool>,
    max_tokens: Option<u32>,
    temperature: Option<f64>,
    top_p: Option<f64>,
    top_k: Option<f64>,
    frequency_penalty: Option<f64>,
    presence_penalty: Option<f64>,
    repetition_penalty: Option<f64>,
    seed: Option<i64>,
    tool_choice: Option<ToolChoice>,
    tools: Option<Vec<ToolDefinition>>,
    logit_bias: Option<HashMap<String, f64>>,
    transforms: Option<Vec<String>>,
    route: Option<Route>,
    provider: Option<ProviderPreferences>,
    reasoning: Option<Reasoning>,
    include_reasoning: Option<bool>,
}

impl ChatRequest {
    pub fn builder() -> ChatRequestBuilder {
        ChatRequestBuilder::default()
    }

    pub fn messages(&self) -> Option<&[Message]> {
        self.messages.as_deref()
    }

    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn models(&self) -> Option<&[String]> {
        self.models.as_deref()
    }

    pub fn stream(&self) -> Option<bool> {
        self.stream
    }

    /// Copy of this request with the `stream` flag set. The streaming entry
    /// point uses this to force `stream=true` without mutating the original.
    pub fn with_stream(&self, stream: bool) -> Self {
        let mut copy = self.clone();
        copy.stream = Some(stream);
        copy
    }
}

/// Builder for [`ChatRequest`]; `build()` runs the XOR validation.
#[derive(Debug, Clone, Default)]
pub struct ChatRequestBuilder {
    messages: Option<Vec<Message>>,
    prompt: Option<String>,
    model: Option<String>,
    models: Option<Vec<String>>,
    response_format: Option<ResponseFormat>,
    usage: Option<UsageAccounting>,
    stop: Option<serde_json::Value>,
    stream: Option<bool>,
    max_tokens: Option<u32>,
    temperature: Option<f64>,
    top_p: Option<f64>,
    top_k: Option<f64>,
    frequency_penalty: Option<f64>,
    presence_penalty: Option<f64>,
    repetition_penalty: Option<f64>,
    seed: Option<i64>,
    tool_choice: Option<ToolChoice>,
    tools: Option<Vec<ToolDefinition>>,
    logit_bias: Option<HashMap<String, f64>>,
    transforms: Option<Vec<String>>,
    route: Option<Route>,
    provider: Option<ProviderPreferences>,
    reasoning: Option<Reasoning>,
    include_reasoning: Option<bool>,
}

impl ChatRequestBuilder {
    pub fn messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = Some(messages);
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn models(mut self, models: Vec<String>) -> Self {
        self.models = Some(models);
        self
    }

    pub fn response_format(mut self, response_format: ResponseFormat) -> Self {
        self.response_format = Some(response_format);
        self
    }

    /// Enable usage accounting in the response.
    pub fn usage(mut self, include: bool) -> Self {
        self.usage = include.then_some(UsageAccounting { include: true });
        self
    }

    /// Accepts a single string or a list of strings.
    pub fn stop(mut self, stop: serde_json::Value) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn stream(mut self, stream: bool) -> Self {
        self.stream = Some(stream);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn top_k(mut self, top_k: f64) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn frequency_penalty(mut self, frequency_penalty: f64) -> Self {
        self.frequency_penalty = Some(frequency_penalty);
        self
    }

    pub fn presence_penalty(mut self, presence_penalty: f64) -> Self {
        self.presence_penalty = Some(presence_penalty);
        self
    }

    pub fn repetition_penalty(mut self, repetition_penalty: f64) -> Self {
        self.repetition_penalty = Some(repetition_penalty);
        self
    }

    pub fn seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn tool_choice(mut self, tool_choice: ToolChoice) -> Self {
        self.tool_choice = Some(tool_choice);
        self
    }

    pub fn tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn logit_bias(mut self, logit_bias: HashMap<String, f64>) -> Self {
        self.logit_bias = Some(logit_bias);
        self
    }

    pub fn transforms(mut self, transforms: Vec<String>) -> Self {
        self.transforms = Some(transforms);
        self
    }

    pub fn route(mut self, route: Route) -> Self {
        self.route = Some(route);
        self
    }

    pub fn provider(mut self, provider: ProviderPreferences) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn reasoning(mut self, reasoning: Reasoning) -> Self {
        self.reasoning = Some(reasoning);
        self
    }

    pub fn include_reasoning(mut self, include_reasoning: bool) -> Self {
        self.include_reasoning = Some(include_reasoning);
        self
    }

    /// Validate and build the request.
    ///
    /// Fails when an XOR pair is violated: exactly one of `messages`/`prompt`
    /// and exactly one of `model`/`models` must be set.
    pub fn build(self) -> Result<ChatRequest> {
        xor_fields(
            self.messages.is_some(),
            "messages",
            self.prompt.is_some(),
            "prompt",
        )?;
        xor_fields(
            self.model.is_some(),
            "model",
            self.models.is_some(),
            "models",
        )?;

        Ok(ChatRequest {
            messages: self.messages,
            prompt: self.prompt,
            model: self.model,
            models: self.models,
            response_format: self.response_format,
            usage: self.usage,
            stop: self.stop,
            stream: self.stream,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
            top_k: self.top_k,
            frequency_penalty: self.frequency_penalty,
            presence_penalty: self.presence_penalty,
            repetition_penalty: self.repetition_penalty,
            seed: self.seed,
            tool_choice: self.tool_choice,
            tools: self.tools,
            logit_bias: self.logit_bias,
            transforms: self.transforms,
            route: self.route,
            provider: self.provider,
            reasoning: self.reasoning,
            include_reasoning: self.include_reasoning,
        })
    }
}

fn xor_fields(first_set: bool, first: &str, second_set: bool, second: &str) -> Result<()> {
    if first_set ^ second_set {
        return Ok(());
    }
    Err(Error::Validation(format!(
        "fields {first} and {second} are XOR-gated, compelling the requirement of either one, \
         but not both simultaneously"
    )))
}
