use std::time::Duration;

use crate::error::{Error, Result};

/// Default public OpenRouter endpoint.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1/";

/// Connection settings for [`crate::OpenRouterClient`].
///
/// The `referer` and `title` fields populate the `HTTP-Referer` and `X-Title`
/// headers OpenRouter uses to identify calling applications; both are
/// optional.
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub api_key: String,
    pub base_url: String,
    pub referer: Option<String>,
    pub title: Option<String>,
    pub timeout: Option<Duration>,
}

impl OpenRouterConfig {
    /// Config with the given API key and the public endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            referer: None,
            title: None,
            timeout: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build a config from the process environment, loading `.env` first if
    /// one is present in the working directory.
    ///
    /// Environment:
    /// - OPENROUTER_API_KEY                  (required)
    /// - OPENROUTER_API_ENDPOINT             (default: public endpoint)
    /// - OPENROUTER_HTTP_REFERER             (optional)
    /// - OPENROUTER_X_TITLE                  (optional)
    /// - OPENROUTER_HTTP_TIMEOUT_SECONDS     (optional, u64)
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let api_key = std::env::var("OPENROUTER_API_KEY")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| Error::Validation("OPENROUTER_API_KEY is not set".to_string()))?;

        let base_url = std::env::var("OPENROUTER_API_ENDPOINT")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let mut config = Self::new(api_key).with_base_url(base_url);

        if let Ok(referer) = std::env::var("OPENROUTER_HTTP_REFERER") {
            if !referer.trim().is_empty() {
                config.referer = Some(referer);
            }
        }
        if let Ok(title) = std::env::var("OPENROUTER_X_TITLE") {
            if !title.trim().is_empty() {
                config.title = Some(title);
            }
        }
        if let Ok(secs) = std::env::var("OPENROUTER_HTTP_TIMEOUT_SECONDS") {
            if let Ok(n) = secs.trim().parse::<u64>() {
                config.timeout = Some(Duration::from_secs(n));
            }
        }

        Ok(config)
    }

    /// Build a `reqwest` client honoring the configured timeout.
    pub fn build_http_client(&self) -> reqwest::Client {
        let mut builder = reqwest::Client::builder()
            .user_agent(format!("openrouter-client/{}", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build().unwrap_or_else(|_| reqwest::Client::new())
    }
}
