//! SSE (Server-Sent Events) line parsing for streaming chat completions.
//!
//! The OpenAI streaming format sends lines like:
//!
//! ```text
//! data: {"choices":[{"delta":{"content":"Hello"}}]}
//!
//! data: {"choices":[{"delta":{"content":" world"}}]}
//!
//! data: [DONE]
//! ```
//!
//! Each non-empty `data:` line is either a JSON delta or the literal
//! `[DONE]` sentinel marking the end of the stream.

use crate::error::{ProviderError, Result};
use crate::types::StreamResponse;

/// The sentinel value that marks the end of an SSE stream.
const DONE_SENTINEL: &str = "[DONE]";

/// A parsed streaming event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// An incremental text fragment.
    Fragment(String),
    /// End of stream.
    Done,
}

/// Parse a single SSE line into at most one [`StreamEvent`].
///
/// Returns `Ok(None)` for event boundaries (empty lines), comment lines,
/// non-`data:` fields, and deltas without text content.
///
/// # Errors
///
/// Returns [`ProviderError::InvalidResponse`] if a `data:` line contains
/// JSON that cannot be parsed as a streaming delta.
pub fn parse_sse_line(line: &str) -> Result<Option<StreamEvent>> {
    let line = line.trim_end();

    // Empty lines are SSE event boundaries; ':' starts a comment.
    if line.is_empty() || line.starts_with(':') {
        return Ok(None);
    }

    let Some(payload) = line.strip_prefix("data:") else {
        // event:, id:, retry: lines
        return Ok(None);
    };
    let payload = payload.trim_start();

    if payload.is_empty() {
        return Ok(None);
    }

    if payload == DONE_SENTINEL {
        return Ok(Some(StreamEvent::Done));
    }

    let response: StreamResponse = serde_json::from_str(payload)
        .map_err(|e| ProviderError::InvalidResponse(format!("failed to parse SSE delta: {e}")))?;

    let fragment = response
        .choices
        .first()
        .and_then(|choice| choice.delta.content.clone())
        .filter(|content| !content.is_empty());

    Ok(fragment.map(StreamEvent::Fragment))
}
