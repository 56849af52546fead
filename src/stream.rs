//! SSE stream reassembly.
//!
//! OpenRouter streams chat completions as `text/event-stream` lines of the
//! form `data: {json}`, separated by blank lines. The transport delivers the
//! body in arbitrary chunks that may split an event anywhere, including in
//! the middle of a JSON value. [`StreamReassembler`] stitches those chunks
//! back into complete JSON objects; [`ChatStream`] adapts a `reqwest`
//! response body into an async stream of decoded [`ChatResponse`] items.

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::Stream;
use serde_json::Value;

use crate::error::Error;
use crate::mapper;
use crate::models::response::ChatResponse;

/// Reassembles arbitrarily-chunked SSE text into decoded chat responses.
///
/// The carry-over buffer holds the tail of the last line that did not yet
/// form a complete JSON object. It belongs to exactly one in-flight stream:
/// use a fresh reassembler (or [`reset`](Self::reset)) per streaming call so
/// state never leaks between streams.
#[derive(Debug, Default)]
pub struct StreamReassembler {
    buffer: String,
}

const DATA_PREFIX: &str = "data: ";

impl StreamReassembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk of stream text, returning every response completed by
    /// it, in order. Decode failures never escape: an undecodable line is
    /// buffered and retried once more context arrives.
    pub fn push(&mut self, chunk: &str) -> Vec<ChatResponse> {
        // Prepend leftover data from the previous chunk, then re-split. A
        // fragment buffered with its `data: ` prefix intact becomes a normal
        // prefixed line again once its continuation arrives.
        let combined = format!("{}{}", std::mem::take(&mut self.buffer), chunk);

        let mut completed = Vec::new();
        // Tracks whether a pending line was already started during this call;
        // gates overwrite vs append for continuation lines below.
        let mut first_line_complete = false;

        for line in combined.split('\n') {
            if let Some(payload) = line.strip_prefix(DATA_PREFIX) {
                match serde_json::from_str::<Value>(payload) {
                    Ok(value) => {
                        completed.push(mapper::chat_response(Some(&value)));
                        first_line_complete = true;
                    }
                    Err(_) => {
                        // JSON continues past this line; keep the raw line,
                        // prefix included, for the next pass.
                        self.buffer = line.to_string();
                    }
                }
            } else if line.trim().is_empty() && !self.buffer.is_empty() {
                // Blank separator line: retry whatever has accumulated.
                if let Ok(value) = serde_json::from_str::<Value>(&self.buffer) {
                    completed.push(mapper::chat_response(Some(&value)));
                    self.buffer.clear();
                }
            } else if !line.trim().is_empty() {
                // Continuation of a split multi-line JSON value.
                if !first_line_complete {
                    self.buffer = line.to_string();
                    first_line_complete = true;
                } else {
                    self.buffer.push_str(line);
                }
            } else {
                self.buffer.push_str(line);
            }
        }

        completed
    }

    /// Drop any buffered partial data, readying this instance for reuse with
    /// an unrelated stream.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Undecoded tail carried over to the next chunk.
    pub fn buffered(&self) -> &str {
        &self.buffer
    }
}

/// Async stream of [`ChatResponse`] items decoded from a streaming response
/// body.
///
/// Owns its [`StreamReassembler`], so each `ChatStream` carries its own
/// buffer state and concurrent streams cannot contaminate each other.
pub struct ChatStream {
    body: Pin<Box<dyn Stream<Item = reqwest::Result<Bytes>> + Send>>,
    reassembler: StreamReassembler,
    pending: VecDeque<ChatResponse>,
    // Trailing bytes of a UTF-8 sequence split across chunk boundaries.
    partial_utf8: Vec<u8>,
}

impl ChatStream {
    /// Wrap a streaming response returned by
    /// [`OpenRouterClient::send_chat_stream`](crate::OpenRouterClient::send_chat_stream).
    pub fn new(response: reqwest::Response) -> Self {
        Self {
            body: Box::pin(response.bytes_stream()),
            reassembler: StreamReassembler::new(),
            pending: VecDeque::new(),
            partial_utf8: Vec::new(),
        }
    }

    /// Decode as much of the accumulated bytes as is valid UTF-8, keeping an
    /// incomplete trailing sequence for the next chunk.
    fn decode_chunk(&mut self, bytes: &[u8]) -> String {
        self.partial_utf8.extend_from_slice(bytes);
        match std::str::from_utf8(&self.partial_utf8) {
            Ok(text) => {
                let text = text.to_string();
                self.partial_utf8.clear();
                text
            }
            Err(err) if err.error_len().is_none() => {
                let valid = err.valid_up_to();
                let text = String::from_utf8_lossy(&self.partial_utf8[..valid]).into_owned();
                self.partial_utf8.drain(..valid);
                text
            }
            Err(_) => {
                let text = String::from_utf8_lossy(&self.partial_utf8).into_owned();
                self.partial_utf8.clear();
                text
            }
        }
    }
}

impl Stream for ChatStream {
    type Item = Result<ChatResponse, Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if let Some(response) = this.pending.pop_front() {
                return Poll::Ready(Some(Ok(response)));
            }
            match this.body.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => {
                    let text = this.decode_chunk(&bytes);
                    this.pending.extend(this.reassembler.push(&text));
                }
                Poll::Ready(Some(Err(err))) => {
                    tracing::warn!(error = %err, "chat stream transport error");
                    return Poll::Ready(Some(Err(Error::Transport(err))));
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
