//! Plugin identity and configuration types.
//!
//! A plugin is identified by its `(name, type)` pair; a configured instance
//! additionally carries an instance name. [`PluginConfiguration`] holds the
//! resolved settings for one instance and is replaced wholesale on store,
//! never mutated in place.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The single instance name used until multi-instance addressing lands.
pub const DEFAULT_PLUGIN_INSTANCE: &str = "default";

/// The declared role of a plugin.
///
/// The declared type determines which capability the workflow engine will
/// invoke for a stage built from this plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PluginType {
    /// Chat-completes a conversation (non-model chatter, e.g. a canned bot).
    Chatter,
    /// A full model backend: chat plus streaming and model listing.
    #[serde(rename = "LLM")]
    Llm,
    /// Produces messages to seed or extend a session.
    #[serde(rename = "Inputs")]
    Input,
    /// Consumes the final message sequence.
    Output,
    /// Rewrites the previous stage's message batch.
    Transformer,
    /// Carries no workflow behavior; metadata only.
    Meta,
}

impl fmt::Display for PluginType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PluginType::Chatter => "Chatter",
            PluginType::Llm => "LLM",
            PluginType::Input => "Inputs",
            PluginType::Output => "Output",
            PluginType::Transformer => "Transformer",
            PluginType::Meta => "Meta",
        };
        f.write_str(name)
    }
}

/// Resolved settings for one plugin instance.
///
/// Identity key is `(name, plugin_type, instance_name)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginConfiguration {
    /// The plugin name this configuration belongs to.
    pub name: String,

    /// The declared type of the plugin.
    pub plugin_type: PluginType,

    /// The instance this configuration parameterizes.
    pub instance_name: String,

    /// Settings as name/value pairs, keyed in CamelCase.
    pub settings: HashMap<String, String>,
}

impl PluginConfiguration {
    /// Create an empty configuration for the given identity.
    pub fn new(
        name: impl Into<String>,
        plugin_type: PluginType,
        instance_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            plugin_type,
            instance_name: instance_name.into(),
            settings: HashMap::new(),
        }
    }

    /// Whether this configuration matches the given identity key.
    pub fn matches(&self, name: &str, plugin_type: PluginType, instance_name: &str) -> bool {
        self.name == name && self.plugin_type == plugin_type && self.instance_name == instance_name
    }

    /// Whether two configurations share the same identity key.
    pub fn same_identity(&self, other: &PluginConfiguration) -> bool {
        self.matches(&other.name, other.plugin_type, &other.instance_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugin_type_display_matches_wire_names() {
        assert_eq!(PluginType::Llm.to_string(), "LLM");
        assert_eq!(PluginType::Input.to_string(), "Inputs");
        assert_eq!(PluginType::Transformer.to_string(), "Transformer");
    }

    #[test]
    fn identity_key_includes_all_three_fields() {
        let a = PluginConfiguration::new("OpenAI", PluginType::Llm, DEFAULT_PLUGIN_INSTANCE);
        assert!(a.matches("OpenAI", PluginType::Llm, "default"));
        assert!(!a.matches("OpenAI", PluginType::Chatter, "default"));
        assert!(!a.matches("OpenAI", PluginType::Llm, "secondary"));
        assert!(!a.matches("Claude", PluginType::Llm, "default"));
    }

    #[test]
    fn same_identity_ignores_settings() {
        let mut a = PluginConfiguration::new("X", PluginType::Input, "default");
        let b = PluginConfiguration::new("X", PluginType::Input, "default");
        a.settings.insert("ApiKey".into(), "abc".into());
        assert!(a.same_identity(&b));
    }
}
