use crate::models::response::ErrorData;

/// Crate-wide error type.
///
/// `Guard` and `Api` are deliberately separate variants: a guard error means
/// the caller used the non-streaming entry point for a streaming request and
/// no network call was made, while `Api` carries a real upstream failure.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Construction-time validation failure (XOR-gated fields, disallowed
    /// enumerated values). Raised before any network I/O.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Wrong entry point for a streaming request. Fixed code 400.
    #[error("{}", .0.message)]
    Guard(ErrorData),

    /// Non-2xx response from the OpenRouter API.
    #[error("OpenRouter API error ({}): {}", .0.code, .0.message)]
    Api(ErrorData),

    /// Transport-level failure (connect, timeout, body read).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body was not valid JSON.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
