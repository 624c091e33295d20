//! End-to-end resolution: registry lookup, settings derivation, factory
//! materialization, and a workflow pass over the assembled chain.

use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio_util::sync::CancellationToken;

use bobbin_core::{Configurator, EnvConfigurator, PluginRegistry, Workflow};
use bobbin_plugin::{
    Chatter, Input, Output, Plugin, PluginError, PluginFactory, Stage, Transformer,
};
use bobbin_types::{ChatOptions, DEFAULT_PLUGIN_INSTANCE, Message, PluginType};

/// Input plugin replaying the message configured as its `Prompt` setting.
struct PromptInput {
    prompt: String,
}

impl Plugin for PromptInput {
    fn name(&self) -> &str {
        "Prompt"
    }

    fn plugin_type(&self) -> PluginType {
        PluginType::Input
    }
}

#[async_trait]
impl Input for PromptInput {
    async fn messages(&self) -> Result<Vec<Message>, PluginError> {
        Ok(vec![Message::user(self.prompt.clone())])
    }
}

struct PromptFactory;

impl Plugin for PromptFactory {
    fn name(&self) -> &str {
        "Prompt"
    }

    fn plugin_type(&self) -> PluginType {
        PluginType::Input
    }
}

impl PluginFactory for PromptFactory {
    fn setup(&self, _instance_name: &str) -> Result<HashMap<String, String>, PluginError> {
        Ok(HashMap::from([("Prompt".to_string(), String::new())]))
    }

    fn create(
        &self,
        _instance_name: &str,
        settings: &HashMap<String, String>,
    ) -> Result<Stage, PluginError> {
        let prompt = settings
            .get("Prompt")
            .cloned()
            .ok_or_else(|| PluginError::NotConfigured("missing Prompt".into()))?;
        Ok(Stage::Input(Arc::new(PromptInput { prompt })))
    }
}

/// Chatter echoing the last user message back, prefixed with its configured
/// greeting.
struct EchoChatter {
    greeting: String,
}

impl Plugin for EchoChatter {
    fn name(&self) -> &str {
        "Echo"
    }

    fn plugin_type(&self) -> PluginType {
        PluginType::Chatter
    }
}

#[async_trait]
impl Chatter for EchoChatter {
    async fn chat(
        &self,
        messages: &[Message],
        _options: Option<&ChatOptions>,
        _cancel: &CancellationToken,
    ) -> Result<Vec<Message>, PluginError> {
        let last = messages
            .last()
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        Ok(vec![Message::assistant(format!("{} {last}", self.greeting))])
    }
}

struct EchoFactory;

impl Plugin for EchoFactory {
    fn name(&self) -> &str {
        "Echo"
    }

    fn plugin_type(&self) -> PluginType {
        PluginType::Chatter
    }
}

impl PluginFactory for EchoFactory {
    fn setup(&self, _instance_name: &str) -> Result<HashMap<String, String>, PluginError> {
        Ok(HashMap::from([("Greeting".to_string(), "re:".to_string())]))
    }

    fn create(
        &self,
        _instance_name: &str,
        settings: &HashMap<String, String>,
    ) -> Result<Stage, PluginError> {
        let greeting = settings
            .get("Greeting")
            .cloned()
            .unwrap_or_else(|| "re:".to_string());
        Ok(Stage::Chat(Arc::new(EchoChatter { greeting })))
    }
}

#[derive(Clone, Default)]
struct SinkOutput {
    captured: Arc<Mutex<Vec<Message>>>,
}

impl Plugin for SinkOutput {
    fn name(&self) -> &str {
        "Sink"
    }

    fn plugin_type(&self) -> PluginType {
        PluginType::Output
    }
}

#[async_trait]
impl Output for SinkOutput {
    async fn output(&self, messages: &[Message]) -> Result<(), PluginError> {
        *self.captured.lock().unwrap() = messages.to_vec();
        Ok(())
    }
}

fn settings_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(
        b"# workflow settings\n\
          PROMPT_PROMPT=tell me a joke\n\
          ECHO_GREETING=you said:  # reply prefix\n",
    )
    .unwrap();
    file
}

#[tokio::test]
async fn registry_configurator_and_workflow_compose() {
    let mut registry = PluginRegistry::new();
    registry.register(Arc::new(PromptFactory));
    registry.register(Arc::new(EchoFactory));

    let file = settings_file();
    let mut configurator = EnvConfigurator::new(file.path(), registry.all_plugins());

    let mut chain = Vec::new();
    for name in ["Prompt", "Echo"] {
        let factory = registry.get(name).unwrap();
        let config = configurator
            .load(DEFAULT_PLUGIN_INSTANCE, factory.as_ref())
            .unwrap();
        chain.push(factory.create(&config.instance_name, &config.settings).unwrap());
    }
    let sink = SinkOutput::default();
    chain.push(Stage::Output(Arc::new(sink.clone())));

    let workflow = Workflow::new(chain).unwrap();
    workflow.execute(&CancellationToken::new()).await.unwrap();

    let captured = sink.captured.lock().unwrap().clone();
    assert_eq!(
        captured,
        vec![
            Message::user("tell me a joke"),
            Message::assistant("you said: tell me a joke"),
        ]
    );
}

#[tokio::test]
async fn transformer_stage_rewrites_the_reply_in_place() {
    struct Exclaim;

    impl Plugin for Exclaim {
        fn name(&self) -> &str {
            "Exclaim"
        }

        fn plugin_type(&self) -> PluginType {
            PluginType::Transformer
        }
    }

    #[async_trait]
    impl Transformer for Exclaim {
        async fn transform(&self, messages: &[Message]) -> Result<Vec<Message>, PluginError> {
            Ok(messages
                .iter()
                .map(|m| Message::new(m.role.clone(), format!("{}!", m.content)))
                .collect())
        }
    }

    let sink = SinkOutput::default();
    let workflow = Workflow::new(vec![
        Stage::Input(Arc::new(PromptInput {
            prompt: "hi".into(),
        })),
        Stage::Chat(Arc::new(EchoChatter {
            greeting: "re:".into(),
        })),
        Stage::Transform(Arc::new(Exclaim)),
        Stage::Output(Arc::new(sink.clone())),
    ])
    .unwrap();

    workflow.execute(&CancellationToken::new()).await.unwrap();

    let captured = sink.captured.lock().unwrap().clone();
    assert_eq!(
        captured,
        vec![Message::user("hi"), Message::assistant("re: hi!")]
    );
}

#[test]
fn factory_lookup_by_position_matches_registration_order() {
    let mut registry = PluginRegistry::new();
    registry.register(Arc::new(PromptFactory));
    registry.register(Arc::new(EchoFactory));

    assert_eq!(registry.get_by_index(2).unwrap().name(), "Echo");
    assert!(registry.get_by_index(3).is_err());
}
