//! Conversational message types.
//!
//! [`Message`] is the unit of conversational state carried through a
//! workflow run. Roles are open strings; the reserved [`ROLE_META`] role
//! marks a message as metadata-only, which keeps it in the session history
//! but excludes it from any model-facing conversation view.

use serde::{Deserialize, Serialize};

/// Role of a system prompt message.
pub const ROLE_SYSTEM: &str = "system";

/// Role of a user-authored message.
pub const ROLE_USER: &str = "user";

/// Role of a model reply message.
pub const ROLE_ASSISTANT: &str = "assistant";

/// Reserved role marking a message as metadata-only.
///
/// Meta messages are retained in the full session history but are excluded
/// from the chat view handed to chat-capable plugins.
pub const ROLE_META: &str = "meta";

/// A message in a conversation.
///
/// Immutable once constructed; a session owns every message it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message author (e.g. "system", "user", "assistant").
    pub role: String,

    /// The content of the message.
    pub content: String,
}

impl Message {
    /// Create a message with an arbitrary role.
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ROLE_SYSTEM, content)
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ROLE_USER, content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ROLE_ASSISTANT, content)
    }

    /// Create a metadata-only message.
    pub fn meta(content: impl Into<String>) -> Self {
        Self::new(ROLE_META, content)
    }

    /// Whether this message is metadata-only.
    pub fn is_meta(&self) -> bool {
        self.role == ROLE_META
    }
}

/// Per-call parameters for a chat completion.
///
/// When `raw` is set, only the model and messages are sent -- every sampling
/// parameter is left to the provider's defaults. A `seed` of `None` is
/// omitted from the request entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatOptions {
    /// The model identifier (e.g. "gpt-4o").
    pub model: String,

    /// Sampling temperature.
    pub temperature: f64,

    /// Nucleus sampling cutoff.
    pub top_p: f64,

    /// Presence penalty.
    pub presence_penalty: f64,

    /// Frequency penalty.
    pub frequency_penalty: f64,

    /// Send only model and messages, leaving all sampling parameters unset.
    pub raw: bool,

    /// Deterministic sampling seed, omitted when `None`.
    pub seed: Option<i64>,
}
