//! Error types for the bobbin core.
//!
//! [`CoreError`] covers lookup failures (registry and configurator), range
//! failures, assembly-time capability mismatches, and stage failures. Stage
//! failures wrap the originating [`PluginError`] transparently so the
//! workflow's caller sees it unchanged.

use thiserror::Error;

use bobbin_plugin::PluginError;

/// Top-level error type for the bobbin core.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No factory registered under the given name.
    #[error("plugin {name} not found")]
    PluginNotFound {
        /// The name that was looked up.
        name: String,
    },

    /// A 1-based registry index was zero or past the end.
    #[error("there is no plugin with the index {index}")]
    NoPluginAtIndex {
        /// The offending index.
        index: usize,
    },

    /// No configuration matched the `(name, type, instance)` identity key.
    #[error("plugin configuration not found for {name} (instance {instance_name})")]
    ConfigurationNotFound {
        /// Plugin name.
        name: String,
        /// Instance name.
        instance_name: String,
    },

    /// A factory produced a stage whose role contradicts the plugin's
    /// declared type.
    #[error("plugin {name} declares type {declared} but provides a {role} stage")]
    CapabilityMismatch {
        /// Plugin name.
        name: String,
        /// The declared plugin type.
        declared: String,
        /// The role of the stage that was produced.
        role: &'static str,
    },

    /// Underlying I/O error (settings file access).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A stage capability call failed; passed through unchanged.
    #[error(transparent)]
    Stage(#[from] PluginError),
}

/// A convenience type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
