//! Plugin capability contracts for bobbin.
//!
//! This crate defines the polymorphic roles a plugin instance can fulfill
//! inside a workflow, plus the factory contract that produces configured
//! instances.
//!
//! # Trait Overview
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`Plugin`] | Name and declared type metadata |
//! | [`Input`] | Produces messages to seed a session |
//! | [`Chatter`] | Chat-completes a conversation |
//! | [`Model`] | Chatter plus token streaming and model listing |
//! | [`Transformer`] | Rewrites a message batch |
//! | [`Output`] | Consumes the final message sequence |
//! | [`PluginFactory`] | Creates configured instances from a settings map |
//!
//! # Stages
//!
//! The workflow engine never downcasts at run time. A factory resolves its
//! plugin into a [`Stage`] -- a closed set of tagged variants, each carrying
//! the concrete capability object -- once at chain-assembly time.
//!
//! All traits are `Send + Sync`. Async methods use `#[async_trait]`.

pub mod error;
pub mod stage;
pub mod traits;

pub use error::PluginError;
pub use stage::Stage;
pub use traits::{
    CancellationToken, Chatter, Input, Model, Output, Plugin, PluginFactory, Transformer,
};
