//! Capability-resolved workflow stages.
//!
//! [`Stage`] is the closed set of roles the workflow engine knows how to
//! drive. Each variant carries the concrete capability object, resolved once
//! at chain-assembly time, so execution never needs a fallible downcast.

use std::fmt;
use std::sync::Arc;

use bobbin_types::PluginType;

use crate::traits::{Chatter, Input, Output, Plugin, Transformer};

/// One plugin's place in a workflow chain, tagged with exactly one role.
#[derive(Clone)]
pub enum Stage {
    /// Fetches messages and appends them to the session.
    Input(Arc<dyn Input>),
    /// Chat-completes the session's chat view and appends the reply.
    Chat(Arc<dyn Chatter>),
    /// Rewrites the previous stage's batch.
    Transform(Arc<dyn Transformer>),
    /// Consumes the full message sequence.
    Output(Arc<dyn Output>),
    /// No workflow behavior; carried for its metadata only.
    Meta(Arc<dyn Plugin>),
}

impl Stage {
    /// The name of the underlying plugin.
    pub fn name(&self) -> &str {
        self.as_plugin().name()
    }

    /// The declared type of the underlying plugin.
    pub fn plugin_type(&self) -> PluginType {
        self.as_plugin().plugin_type()
    }

    /// The underlying plugin as a plain metadata handle.
    pub fn as_plugin(&self) -> &dyn Plugin {
        match self {
            Stage::Input(p) => p.as_ref(),
            Stage::Chat(p) => p.as_ref(),
            Stage::Transform(p) => p.as_ref(),
            Stage::Output(p) => p.as_ref(),
            Stage::Meta(p) => p.as_ref(),
        }
    }

    /// Whether this stage's role is consistent with the plugin's declared
    /// type.
    ///
    /// Both `Chatter` and `LLM` plugins resolve to a chat stage; every other
    /// type maps one-to-one. A mismatch is a configuration error surfaced at
    /// assembly time, never skipped.
    pub fn matches_declared_type(&self) -> bool {
        matches!(
            (self, self.plugin_type()),
            (Stage::Input(_), PluginType::Input)
                | (Stage::Chat(_), PluginType::Chatter)
                | (Stage::Chat(_), PluginType::Llm)
                | (Stage::Transform(_), PluginType::Transformer)
                | (Stage::Output(_), PluginType::Output)
                | (Stage::Meta(_), PluginType::Meta)
        )
    }

    /// The role this stage fulfills, for diagnostics.
    pub fn role(&self) -> &'static str {
        match self {
            Stage::Input(_) => "input",
            Stage::Chat(_) => "chat",
            Stage::Transform(_) => "transform",
            Stage::Output(_) => "output",
            Stage::Meta(_) => "meta",
        }
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("role", &self.role())
            .field("name", &self.name())
            .field("type", &self.plugin_type())
            .finish()
    }
}
