//! Provider error types for bobbin-llm.

use thiserror::Error;

use bobbin_plugin::PluginError;

/// Errors that can occur when talking to an OpenAI-compatible endpoint.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The HTTP request to the provider failed.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// Authentication with the provider was rejected (HTTP 401/403).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested model does not exist on the provider.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The provider has not been configured (e.g. missing API key).
    #[error("provider not configured: {0}")]
    NotConfigured(String),

    /// The provider returned a response that could not be parsed.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The caller cancelled the request.
    #[error("cancelled")]
    Cancelled,

    /// An HTTP-level error from reqwest.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// A JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ProviderError> for PluginError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotConfigured(message) => PluginError::NotConfigured(message),
            ProviderError::Cancelled => PluginError::Cancelled,
            other => PluginError::ExecutionFailed(other.to_string()),
        }
    }
}

/// A convenience type alias for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;
