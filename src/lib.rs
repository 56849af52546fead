#![forbid(unsafe_code)]
#![doc = r#"
openrouter-client

Typed client for the OpenRouter LLM API: chat completions (plain and SSE
streaming), generation cost lookups and API-key rate-limit lookups.

Crate highlights
- Validated requests: `ChatRequest::builder()` enforces the `messages`/`prompt`
  and `model`/`models` XOR invariants at build time, before any network I/O.
- Null-free serialization: unset optional fields are omitted recursively.
- Stream reassembly: `StreamReassembler` stitches arbitrarily-chunked SSE
  bytes back into complete JSON events; `ChatStream` wraps it as an async
  stream over a `reqwest` response body.

Modules
- `models`: request and response data structures.
- `mapper`: tolerant JSON-to-typed-response conversion.
- `stream`: SSE reassembly and the async stream adapter.
- `client`: the HTTP client (`send_chat`, `send_chat_stream`, `get_cost`,
  `get_rate_limit`).
- `config`: endpoint, credentials and transport settings.

Note: retry/backoff on transient statuses is intentionally left to the
transport layer; this client performs one attempt per call.
"#]

pub mod client;
pub mod config;
pub mod error;
pub mod mapper;
pub mod models;
pub mod stream;

// Re-export the primary types for ergonomic library use.
pub use crate::client::{OpenRouterClient, STREAM_GUARD_MESSAGE};
pub use crate::config::OpenRouterConfig;
pub use crate::error::{Error, Result};
pub use crate::stream::{ChatStream, StreamReassembler};

// Re-export model namespaces for convenience (downstream users can do
// `use openrouter_client::chat`).
pub use crate::models::{chat, response};
