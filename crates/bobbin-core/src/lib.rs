//! # bobbin-core
//!
//! The execution core of the bobbin workflow engine:
//!
//! - **[`session`]** -- [`Session`], the mutable conversational state a
//!   workflow run drives
//! - **[`workflow`]** -- [`Workflow`], a linear pass over a chain of
//!   capability-resolved stages
//! - **[`registry`]** -- [`PluginRegistry`], an insertion-ordered catalog of
//!   plugin factories
//! - **[`configurator`]** -- the [`Configurator`] contract plus in-memory
//!   and env-file-backed implementations
//! - **[`env_file`]** -- the `KEY=VALUE` settings-file parser with process
//!   environment override visibility
//!
//! Registries are constructed explicitly and handed to whatever assembles a
//! workflow; there is no process-wide default registry.

pub mod configurator;
pub mod env_file;
pub mod error;
pub mod registry;
pub mod session;
pub mod workflow;

pub use configurator::{Configurator, EnvConfigurator, MemoryConfigurator};
pub use env_file::EnvFileLine;
pub use error::{CoreError, Result};
pub use registry::{PluginGroup, PluginRegistry};
pub use session::Session;
pub use workflow::{Workflow, WorkflowBuilder};
