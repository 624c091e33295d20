//! Workflow execution.
//!
//! A [`Workflow`] is an ordered chain of capability-resolved [`Stage`]s,
//! interpreted as a single linear pass over one fresh [`Session`]. The first
//! stage error aborts the remaining chain and is returned to the caller
//! unchanged; there are no retries and no partial rollback of effects a
//! stage committed before failing.

use tracing::debug;

use bobbin_plugin::{CancellationToken, Stage};

use crate::error::{CoreError, Result};
use crate::session::Session;

/// An ordered chain of live plugin stages.
#[derive(Debug)]
pub struct Workflow {
    chain: Vec<Stage>,
}

impl Workflow {
    /// Assemble a workflow from a stage chain.
    ///
    /// Fails fast with [`CoreError::CapabilityMismatch`] if any stage's role
    /// contradicts its plugin's declared type; a mismatched stage is a
    /// configuration error, never silently skipped at run time.
    pub fn new(chain: Vec<Stage>) -> Result<Self> {
        for stage in &chain {
            if !stage.matches_declared_type() {
                return Err(CoreError::CapabilityMismatch {
                    name: stage.name().to_string(),
                    declared: stage.plugin_type().to_string(),
                    role: stage.role(),
                });
            }
        }
        Ok(Self { chain })
    }

    /// The assembled stage chain, in execution order.
    pub fn chain(&self) -> &[Stage] {
        &self.chain
    }

    /// Run the chain against a fresh empty session.
    ///
    /// `cancel` is threaded through to chat-capable stages; the engine
    /// itself implements no timeout policy.
    pub async fn execute(&self, cancel: &CancellationToken) -> Result<()> {
        let mut session = Session::new();
        for stage in &self.chain {
            debug!(plugin = stage.name(), role = stage.role(), "running stage");
            match stage {
                Stage::Input(input) => {
                    let messages = input.messages().await?;
                    session.append(messages);
                }
                Stage::Chat(chatter) => {
                    let view = session.chat_messages();
                    let reply = chatter.chat(&view, None, cancel).await?;
                    session.append(reply);
                }
                Stage::Transform(transformer) => {
                    let batch = session.last_messages().to_vec();
                    let rewritten = transformer.transform(&batch).await?;
                    session.replace_last_messages(rewritten);
                }
                Stage::Output(output) => {
                    output.output(session.messages()).await?;
                }
                Stage::Meta(_) => {}
            }
        }
        Ok(())
    }
}

/// Contract for external collaborators that assemble a workflow, e.g. from
/// CLI-style arguments.
pub trait WorkflowBuilder {
    /// Produce an assembled workflow.
    fn build(&self) -> Result<Workflow>;
}
