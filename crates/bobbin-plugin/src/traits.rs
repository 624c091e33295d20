//! Capability trait definitions.
//!
//! A plugin instance is identified by its `(name, type)` pair via the
//! [`Plugin`] supertrait and is additionally polymorphic over zero or more
//! behavioral capabilities:
//!
//! - [`Input`] -- produces messages
//! - [`Chatter`] -- chat-completes a conversation
//! - [`Model`] -- a chatter that can also stream tokens and list models
//! - [`Transformer`] -- rewrites a message batch
//! - [`Output`] -- consumes the final message sequence
//! - [`PluginFactory`] -- creates configured instances from a settings map
//!
//! Cancellation is a pass-through contract: the caller supplies a
//! [`CancellationToken`] to `chat` / `chat_stream` and the plugin decides
//! how to honor it. No timeout policy lives in the core.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::mpsc;
pub use tokio_util::sync::CancellationToken;

use bobbin_types::{ChatOptions, Message, PluginType};

use crate::error::PluginError;
use crate::stage::Stage;

/// Name and declared-type metadata shared by every plugin role.
pub trait Plugin: Send + Sync {
    /// Unique plugin name (e.g. `"OpenAI"`, `"YouTube"`).
    fn name(&self) -> &str;

    /// The declared role of this plugin.
    fn plugin_type(&self) -> PluginType;
}

/// A plugin that produces a sequence of messages.
///
/// The workflow engine appends the produced messages to the session.
#[async_trait]
pub trait Input: Plugin {
    /// Fetch the messages this input contributes.
    async fn messages(&self) -> Result<Vec<Message>, PluginError>;
}

/// A plugin that chat-completes a conversation.
///
/// The engine invokes it with the session's chat view (meta messages
/// stripped) and appends the returned reply messages.
#[async_trait]
pub trait Chatter: Plugin {
    /// Complete the conversation and return the reply message(s).
    ///
    /// `options` of `None` leaves every model parameter to the plugin's
    /// defaults. `cancel` is threaded through to the underlying call.
    async fn chat(
        &self,
        messages: &[Message],
        options: Option<&ChatOptions>,
        cancel: &CancellationToken,
    ) -> Result<Vec<Message>, PluginError>;
}

/// A full model backend: a [`Chatter`] that can additionally stream
/// incremental token fragments and enumerate its available models.
#[async_trait]
pub trait Model: Chatter {
    /// List the model identifiers this backend can serve.
    async fn list_models(&self) -> Result<Vec<String>, PluginError>;

    /// Complete the conversation, pushing text fragments into `fragments`
    /// as they are generated.
    ///
    /// Fragments arrive in generation order. Dropping the sender closes the
    /// channel and is the single end-of-stream signal; a terminal `"\n"`
    /// fragment is emitted first.
    async fn chat_stream(
        &self,
        messages: &[Message],
        options: Option<&ChatOptions>,
        cancel: &CancellationToken,
        fragments: mpsc::Sender<String>,
    ) -> Result<(), PluginError>;
}

/// A plugin that rewrites a message batch.
///
/// Transformers receive the immediately preceding stage's output, not the
/// whole history; the engine substitutes the returned batch for it.
#[async_trait]
pub trait Transformer: Plugin {
    /// Rewrite the given batch.
    async fn transform(&self, messages: &[Message]) -> Result<Vec<Message>, PluginError>;
}

/// A plugin that consumes the final message sequence.
///
/// Side-effecting; produces no session mutation.
#[async_trait]
pub trait Output: Plugin {
    /// Consume the full message history.
    async fn output(&self, messages: &[Message]) -> Result<(), PluginError>;
}

/// A factory that produces configured plugin instances.
///
/// Factories are what a [registry](https://docs.rs/bobbin-core) catalogs;
/// they report which settings they need and materialize a ready [`Stage`]
/// from a resolved settings map.
pub trait PluginFactory: Plugin {
    /// Report the default settings for the given instance.
    fn setup(&self, instance_name: &str) -> Result<HashMap<String, String>, PluginError>;

    /// Materialize a configured instance as a capability-resolved stage.
    fn create(
        &self,
        instance_name: &str,
        settings: &HashMap<String, String>,
    ) -> Result<Stage, PluginError>;
}
