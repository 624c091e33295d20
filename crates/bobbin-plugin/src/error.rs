//! Plugin error types.
//!
//! Defines [`PluginError`], the unified error type for all capability calls
//! made by the workflow engine. A stage error aborts the remaining chain and
//! is handed back to the workflow's caller unchanged.

use thiserror::Error;

/// Errors produced by plugin operations.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The plugin could not be materialized from its settings.
    #[error("plugin not configured: {0}")]
    NotConfigured(String),

    /// A capability call failed at runtime.
    #[error("plugin execution failed: {0}")]
    ExecutionFailed(String),

    /// The caller cancelled the call through its cancellation token.
    #[error("cancelled")]
    Cancelled,

    /// I/O error during a plugin operation.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
