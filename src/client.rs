use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use serde_json::Value;

use crate::config::OpenRouterConfig;
use crate::error::{Error, Result};
use crate::mapper;
use crate::models::chat::ChatRequest;
use crate::models::response::{ChatResponse, CostResponse, ErrorData, RateLimitResponse};
use crate::stream::ChatStream;

/// Fixed guard message returned when `send_chat` is called with `stream=true`.
pub const STREAM_GUARD_MESSAGE: &str =
    "For streaming chat completion please use the \"send_chat_stream\" method instead!";

/// Client for the OpenRouter API.
///
/// Thin wrapper over a shared `reqwest::Client`; cheap to clone. Retrying
/// transient 429/5xx failures is left to the caller or a middleware-equipped
/// transport, this client performs a single attempt per operation.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    http: reqwest::Client,
    config: OpenRouterConfig,
}

impl OpenRouterClient {
    pub fn new(config: OpenRouterConfig) -> Self {
        let http = config.build_http_client();
        Self { http, config }
    }

    /// Use a caller-supplied transport instead of building one from the
    /// config (connection pooling, proxies and retries live there).
    pub fn with_http_client(http: reqwest::Client, config: OpenRouterConfig) -> Self {
        Self { http, config }
    }

    /// Client configured from the environment; see
    /// [`OpenRouterConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(OpenRouterConfig::from_env()?))
    }

    fn endpoint(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        format!("{base}/{path}")
    }

    fn decorate(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let mut builder = builder.bearer_auth(&self.config.api_key);
        if let Some(referer) = &self.config.referer {
            builder = builder.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.config.title {
            builder = builder.header("X-Title", title);
        }
        builder
    }

    /// Reject a non-2xx response, surfacing the body text as the error
    /// message.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), "OpenRouter API request failed");
        Err(Error::Api(ErrorData {
            code: status.as_u16(),
            message,
        }))
    }

    /// Send a non-streaming chat-completion request.
    ///
    /// Requests with `stream=true` are rejected up front with a fixed
    /// [`Error::Guard`] (code 400) before any network I/O; use
    /// [`send_chat_stream`](Self::send_chat_stream) for those.
    pub async fn send_chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        if request.stream() == Some(true) {
            return Err(Error::Guard(ErrorData {
                code: 400,
                message: STREAM_GUARD_MESSAGE.to_string(),
            }));
        }

        tracing::debug!(model = ?request.model(), "sending chat completion request");
        let response = self
            .decorate(self.http.post(self.endpoint("chat/completions")))
            .json(request)
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;

        let body: Value = response.json().await?;
        Ok(mapper::chat_response(Some(&body)))
    }

    /// Send a streaming chat-completion request, returning the raw response
    /// handle with its body unconsumed.
    ///
    /// `stream=true` is forced on a copy of the request. Drive the body
    /// through a [`crate::StreamReassembler`], or use
    /// [`chat_stream`](Self::chat_stream) for a ready-made async stream.
    pub async fn send_chat_stream(&self, request: &ChatRequest) -> Result<reqwest::Response> {
        let request = request.with_stream(true);

        tracing::debug!(model = ?request.model(), "sending streaming chat completion request");
        // The event-stream content type is set first; `json()` only applies
        // its own when none is present.
        let response = self
            .decorate(self.http.post(self.endpoint("chat/completions")))
            .header(CONTENT_TYPE, "text/event-stream")
            .header(CACHE_CONTROL, "no-cache")
            .json(&request)
            .send()
            .await?;
        Self::ensure_success(response).await
    }

    /// Streaming chat completion as an async stream of decoded responses.
    pub async fn chat_stream(&self, request: &ChatRequest) -> Result<ChatStream> {
        Ok(ChatStream::new(self.send_chat_stream(request).await?))
    }

    /// Look up cost and statistics for a generation id returned by a chat
    /// completion.
    pub async fn get_cost(&self, generation_id: &str) -> Result<CostResponse> {
        let response = self
            .decorate(self.http.get(self.endpoint("generation")))
            .query(&[("id", generation_id)])
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;

        let body: Value = response.json().await?;
        Ok(mapper::cost_response(Some(&body)))
    }

    /// Look up the rate limit and credits left on the configured API key.
    pub async fn get_rate_limit(&self) -> Result<RateLimitResponse> {
        let response = self
            .decorate(self.http.get(self.endpoint("auth/key")))
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;

        let body: Value = response.json().await?;
        Ok(mapper::rate_limit_response(Some(&body)))
    }
}
