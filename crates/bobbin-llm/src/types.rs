//! Wire types for the OpenAI chat completion API.
//!
//! These mirror the request/response format that has become the de facto
//! standard across OpenAI-compatible providers. They are standalone and have
//! no dependency on other bobbin crates.

use serde::{Deserialize, Serialize};

use bobbin_types::{ChatOptions, Message};

/// A message in the wire format (`role` + `content` only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCompletionMessage {
    /// The role of the message author.
    pub role: String,

    /// The content of the message.
    pub content: String,
}

impl From<&Message> for ChatCompletionMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role.clone(),
            content: message.content.clone(),
        }
    }
}

/// A chat completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    /// The model identifier.
    pub model: String,

    /// The conversation messages.
    pub messages: Vec<ChatCompletionMessage>,

    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Nucleus sampling cutoff.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,

    /// Presence penalty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,

    /// Frequency penalty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,

    /// Deterministic sampling seed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,

    /// Whether to stream the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

impl ChatCompletionRequest {
    /// Build a request from session messages and per-call options.
    ///
    /// With `raw` options only the model and messages are sent. A seed of
    /// `None` is omitted from the request entirely. `options` of `None`
    /// falls back to the given default model with provider-default sampling.
    pub fn build(messages: &[Message], options: Option<&ChatOptions>, default_model: &str) -> Self {
        let messages: Vec<ChatCompletionMessage> =
            messages.iter().map(ChatCompletionMessage::from).collect();

        let Some(options) = options else {
            return Self::bare(default_model.to_string(), messages);
        };

        let model = if options.model.is_empty() {
            default_model.to_string()
        } else {
            options.model.clone()
        };

        if options.raw {
            return Self::bare(model, messages);
        }

        Self {
            model,
            messages,
            temperature: Some(options.temperature),
            top_p: Some(options.top_p),
            presence_penalty: Some(options.presence_penalty),
            frequency_penalty: Some(options.frequency_penalty),
            seed: options.seed,
            stream: None,
        }
    }

    fn bare(model: String, messages: Vec<ChatCompletionMessage>) -> Self {
        Self {
            model,
            messages,
            temperature: None,
            top_p: None,
            presence_penalty: None,
            frequency_penalty: None,
            seed: None,
            stream: None,
        }
    }
}

/// A chat completion response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    /// The list of completion choices.
    pub choices: Vec<Choice>,

    /// Backend fingerprint of the configuration that served the request.
    #[serde(default)]
    pub system_fingerprint: Option<String>,
}

/// A single completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    /// The assistant's reply message.
    pub message: ChatCompletionMessage,

    /// Why generation stopped.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// A streaming response chunk (one SSE `data:` payload).
#[derive(Debug, Clone, Deserialize)]
pub struct StreamResponse {
    /// Streaming choices carrying content deltas.
    pub choices: Vec<StreamChoice>,
}

/// A single streaming choice.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamChoice {
    /// The incremental payload.
    pub delta: StreamDelta,

    /// Present on the final chunk of a choice.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// The incremental content of a streaming chunk.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamDelta {
    /// Appended text, when this chunk carries any.
    #[serde(default)]
    pub content: Option<String>,
}

/// Response of the model listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelsResponse {
    /// The available models.
    pub data: Vec<ModelInfo>,
}

/// One entry of the model listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelInfo {
    /// The model identifier.
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> ChatOptions {
        ChatOptions {
            model: "gpt-4o".into(),
            temperature: 0.7,
            top_p: 0.9,
            presence_penalty: 0.1,
            frequency_penalty: 0.2,
            raw: false,
            seed: None,
        }
    }

    #[test]
    fn build_without_options_uses_default_model_only() {
        let request = ChatCompletionRequest::build(&[Message::user("hi")], None, "fallback");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "fallback");
        assert_eq!(json["messages"][0]["content"], "hi");
        assert!(json.get("temperature").is_none());
        assert!(json.get("seed").is_none());
    }

    #[test]
    fn raw_options_send_only_model_and_messages() {
        let mut opts = options();
        opts.raw = true;
        opts.seed = Some(42);
        let request = ChatCompletionRequest::build(&[Message::user("hi")], Some(&opts), "d");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o");
        assert!(json.get("temperature").is_none());
        assert!(json.get("seed").is_none());
    }

    #[test]
    fn sampling_parameters_are_sent_when_not_raw() {
        let request = ChatCompletionRequest::build(&[], Some(&options()), "d");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["temperature"], 0.7);
        assert_eq!(json["top_p"], 0.9);
        assert!(json.get("seed").is_none());
    }

    #[test]
    fn seed_is_included_when_set() {
        let mut opts = options();
        opts.seed = Some(7);
        let request = ChatCompletionRequest::build(&[], Some(&opts), "d");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["seed"], 7);
    }

    #[test]
    fn empty_options_model_falls_back_to_default() {
        let mut opts = options();
        opts.model = String::new();
        let request = ChatCompletionRequest::build(&[], Some(&opts), "fallback");
        assert_eq!(request.model, "fallback");
    }

    #[test]
    fn response_parses_choices_and_fingerprint() {
        let json = serde_json::json!({
            "id": "chatcmpl-1",
            "model": "gpt-4o",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "hello"},
                "finish_reason": "stop"
            }],
            "system_fingerprint": "fp_abc"
        });
        let response: ChatCompletionResponse = serde_json::from_value(json).unwrap();
        assert_eq!(response.choices[0].message.content, "hello");
        assert_eq!(response.system_fingerprint.as_deref(), Some("fp_abc"));
    }
}
