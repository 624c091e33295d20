//! # bobbin-types
//!
//! Core type definitions for the bobbin workflow engine.
//!
//! This crate is the foundation of the dependency graph -- all other
//! bobbin crates depend on it. It contains:
//!
//! - **[`message`]** -- [`Message`] and [`ChatOptions`], the conversational
//!   state unit and per-call model parameters
//! - **[`plugin`]** -- [`PluginType`] and [`PluginConfiguration`], the
//!   declared role of a plugin and its resolved per-instance settings

pub mod message;
pub mod plugin;

pub use message::{ChatOptions, Message, ROLE_ASSISTANT, ROLE_META, ROLE_SYSTEM, ROLE_USER};
pub use plugin::{DEFAULT_PLUGIN_INSTANCE, PluginConfiguration, PluginType};
