//! The OpenAI-compatible chat plugin and its factory.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use bobbin_plugin::{
    CancellationToken, Chatter, Model, Plugin, PluginError, PluginFactory, Stage,
};
use bobbin_types::{ChatOptions, Message, PluginType, ROLE_ASSISTANT};

use crate::error::{ProviderError, Result};
use crate::sse::{StreamEvent, parse_sse_line};
use crate::types::{ChatCompletionRequest, ChatCompletionResponse, ModelsResponse};

const PLUGIN_NAME: &str = "OpenAI";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o";

/// A chat-capable plugin backed by an OpenAI-compatible endpoint.
///
/// Works against any API following the OpenAI chat completion format by
/// changing the base URL.
pub struct OpenAiChatter {
    name: String,
    base_url: String,
    api_key: Option<String>,
    default_model: String,
    http: reqwest::Client,
}

impl OpenAiChatter {
    /// Create a chatter against the OpenAI endpoint.
    pub fn new(api_key: Option<String>) -> Self {
        Self::compatible(PLUGIN_NAME, DEFAULT_BASE_URL, api_key)
    }

    /// Create a chatter against an OpenAI-compatible vendor endpoint.
    pub fn compatible(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            api_key,
            default_model: DEFAULT_MODEL.to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Override the model used when a chat call carries no options.
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn models_url(&self) -> String {
        format!("{}/models", self.base_url.trim_end_matches('/'))
    }

    fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ProviderError::NotConfigured(format!("missing ApiKey for {}", self.name)))
    }

    async fn complete(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse> {
        let api_key = self.require_api_key()?;

        debug!(
            plugin = %self.name,
            model = %request.model,
            messages = request.messages.len(),
            "sending chat completion request"
        );

        let response = self
            .http
            .post(self.completions_url())
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_for_status(status, body, &request.model));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("failed to parse response: {e}")))?;
        Ok(completion)
    }

    async fn stream_completion(
        &self,
        request: &ChatCompletionRequest,
        cancel: &CancellationToken,
        fragments: &mpsc::Sender<String>,
    ) -> Result<()> {
        let api_key = self.require_api_key()?;

        let mut request = request.clone();
        request.stream = Some(true);

        debug!(
            plugin = %self.name,
            model = %request.model,
            "sending streaming chat completion request"
        );

        let response = self
            .http
            .post(self.completions_url())
            .bearer_auth(api_key)
            .header("Accept", "text/event-stream")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_for_status(status, body, &request.model));
        }

        let mut byte_stream = response.bytes_stream();
        let mut buffer = String::new();

        loop {
            let next = tokio::select! {
                _ = cancel.cancelled() => return Err(ProviderError::Cancelled),
                next = byte_stream.next() => next,
            };
            let Some(chunk) = next else { break };
            let bytes =
                chunk.map_err(|e| ProviderError::RequestFailed(format!("stream read error: {e}")))?;
            buffer.push_str(&String::from_utf8_lossy(&bytes));

            while let Some(newline) = buffer.find('\n') {
                let line: String = buffer.drain(..=newline).collect();
                match parse_sse_line(&line) {
                    Ok(Some(StreamEvent::Fragment(text))) => {
                        if fragments.send(text).await.is_err() {
                            debug!(plugin = %self.name, "stream receiver dropped, stopping");
                            return Ok(());
                        }
                    }
                    Ok(Some(StreamEvent::Done)) => {
                        let _ = fragments.send("\n".to_string()).await;
                        return Ok(());
                    }
                    Ok(None) => {}
                    Err(e) => {
                        warn!(plugin = %self.name, error = %e, "SSE parse error, skipping line");
                    }
                }
            }
        }

        // A final fragment may arrive without a trailing newline.
        if !buffer.trim().is_empty()
            && let Ok(Some(StreamEvent::Fragment(text))) = parse_sse_line(&buffer)
        {
            let _ = fragments.send(text).await;
        }

        let _ = fragments.send("\n".to_string()).await;
        Ok(())
    }
}

fn error_for_status(
    status: reqwest::StatusCode,
    body: String,
    model: &str,
) -> ProviderError {
    match status.as_u16() {
        401 | 403 => ProviderError::AuthFailed(body),
        404 => ProviderError::ModelNotFound(format!("model '{model}': {body}")),
        _ => ProviderError::RequestFailed(format!("HTTP {status}: {body}")),
    }
}

impl Plugin for OpenAiChatter {
    fn name(&self) -> &str {
        &self.name
    }

    fn plugin_type(&self) -> PluginType {
        PluginType::Llm
    }
}

#[async_trait]
impl Chatter for OpenAiChatter {
    async fn chat(
        &self,
        messages: &[Message],
        options: Option<&ChatOptions>,
        cancel: &CancellationToken,
    ) -> std::result::Result<Vec<Message>, PluginError> {
        let request = ChatCompletionRequest::build(messages, options, &self.default_model);

        let completion = tokio::select! {
            _ = cancel.cancelled() => return Err(PluginError::Cancelled),
            completion = self.complete(&request) => completion?,
        };

        if let Some(fingerprint) = completion.system_fingerprint.as_deref() {
            debug!(plugin = %self.name, fingerprint, "system fingerprint");
        }

        Ok(completion
            .choices
            .into_iter()
            .next()
            .map(|choice| {
                let role = if choice.message.role.is_empty() {
                    ROLE_ASSISTANT.to_string()
                } else {
                    choice.message.role
                };
                vec![Message::new(role, choice.message.content)]
            })
            .unwrap_or_default())
    }
}

#[async_trait]
impl Model for OpenAiChatter {
    async fn list_models(&self) -> std::result::Result<Vec<String>, PluginError> {
        let api_key = self.require_api_key()?;

        let response = self
            .http
            .get(self.models_url())
            .bearer_auth(api_key)
            .send()
            .await
            .map_err(ProviderError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_for_status(status, body, "").into());
        }

        let models: ModelsResponse = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("failed to parse model listing: {e}"))
        })?;
        Ok(models.data.into_iter().map(|model| model.id).collect())
    }

    async fn chat_stream(
        &self,
        messages: &[Message],
        options: Option<&ChatOptions>,
        cancel: &CancellationToken,
        fragments: mpsc::Sender<String>,
    ) -> std::result::Result<(), PluginError> {
        let request = ChatCompletionRequest::build(messages, options, &self.default_model);
        self.stream_completion(&request, cancel, &fragments)
            .await
            .map_err(PluginError::from)
    }
}

/// Factory producing configured [`OpenAiChatter`] stages.
///
/// Settings keys: `ApiKey`, `ApiBaseUrl`, `Model`.
pub struct OpenAiFactory {
    name: String,
    default_base_url: String,
}

impl OpenAiFactory {
    /// Factory for the OpenAI endpoint.
    pub fn new() -> Self {
        Self::compatible(PLUGIN_NAME, DEFAULT_BASE_URL)
    }

    /// Factory for an OpenAI-compatible vendor endpoint.
    pub fn compatible(name: impl Into<String>, default_base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_base_url: default_base_url.into(),
        }
    }
}

impl Default for OpenAiFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for OpenAiFactory {
    fn name(&self) -> &str {
        &self.name
    }

    fn plugin_type(&self) -> PluginType {
        PluginType::Llm
    }
}

impl PluginFactory for OpenAiFactory {
    fn setup(
        &self,
        _instance_name: &str,
    ) -> std::result::Result<HashMap<String, String>, PluginError> {
        Ok(HashMap::new())
    }

    fn create(
        &self,
        _instance_name: &str,
        settings: &HashMap<String, String>,
    ) -> std::result::Result<Stage, PluginError> {
        let api_key = settings.get("ApiKey").filter(|key| !key.is_empty()).cloned();
        let base_url = settings
            .get("ApiBaseUrl")
            .filter(|url| !url.is_empty())
            .cloned()
            .unwrap_or_else(|| self.default_base_url.clone());

        let mut chatter = OpenAiChatter::compatible(self.name.clone(), base_url, api_key);
        if let Some(model) = settings.get("Model").filter(|model| !model.is_empty()) {
            chatter = chatter.with_default_model(model.clone());
        }
        Ok(Stage::Chat(Arc::new(chatter)))
    }
}
