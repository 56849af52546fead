//! Data models for OpenRouter requests and responses.
//!
//! - `chat`: request-side types (`ChatRequest` + builder, messages, tools,
//!   provider routing preferences).
//! - `response`: response-side types (`ChatResponse`, choices, usage, cost
//!   and rate-limit records).

pub mod chat;
pub mod response;
