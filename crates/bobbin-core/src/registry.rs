//! Plugin factory registry.
//!
//! [`PluginRegistry`] catalogs plugin factories by name, preserving
//! registration order. The order matters only for index-based lookup and
//! display grouping; the registry owns factories, never the instances they
//! produce. Registries are constructed explicitly -- there is no
//! process-wide default.

use std::sync::Arc;

use bobbin_plugin::{Plugin, PluginFactory};
use bobbin_types::PluginType;

use crate::error::{CoreError, Result};

/// An insertion-ordered catalog of plugin factories.
#[derive(Default)]
pub struct PluginRegistry {
    factories: Vec<Arc<dyn PluginFactory>>,
}

/// A contiguous run of same-typed registry entries, for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginGroup {
    /// The declared type shared by every entry in the run.
    pub plugin_type: PluginType,
    /// `(1-based position, name)` pairs; the position counter runs across
    /// groups.
    pub plugins: Vec<(usize, String)>,
}

impl PluginRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under its own name.
    ///
    /// A factory with a name already present replaces that entry in place,
    /// preserving its original position.
    pub fn register(&mut self, factory: Arc<dyn PluginFactory>) {
        match self
            .factories
            .iter_mut()
            .find(|existing| existing.name() == factory.name())
        {
            Some(slot) => *slot = factory,
            None => self.factories.push(factory),
        }
    }

    /// Look up a factory by name.
    pub fn get(&self, name: &str) -> Result<Arc<dyn PluginFactory>> {
        self.factories
            .iter()
            .find(|factory| factory.name() == name)
            .cloned()
            .ok_or_else(|| CoreError::PluginNotFound {
                name: name.to_string(),
            })
    }

    /// Look up a factory by 1-based registration position.
    pub fn get_by_index(&self, index: usize) -> Result<Arc<dyn PluginFactory>> {
        if index == 0 || index > self.factories.len() {
            return Err(CoreError::NoPluginAtIndex { index });
        }
        Ok(self.factories[index - 1].clone())
    }

    /// Number of registered factories.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether the registry holds no factories.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// All registered factories as plain plugin handles, in registration
    /// order.
    ///
    /// The configurator scans these to know which settings prefixes exist.
    pub fn all_plugins(&self) -> Vec<Arc<dyn Plugin>> {
        self.factories
            .iter()
            .map(|factory| -> Arc<dyn Plugin> { factory.clone() })
            .collect()
    }

    /// Group entries by contiguous runs of identical type, each group
    /// introduced once, with a running 1-based counter.
    ///
    /// Pure presentation; has no effect on resolution.
    pub fn list_grouped(&self) -> Vec<PluginGroup> {
        let mut groups: Vec<PluginGroup> = Vec::new();
        for (position, factory) in self.factories.iter().enumerate() {
            let plugin_type = factory.plugin_type();
            let entry = (position + 1, factory.name().to_string());
            match groups.last_mut() {
                Some(group) if group.plugin_type == plugin_type => group.plugins.push(entry),
                _ => groups.push(PluginGroup {
                    plugin_type,
                    plugins: vec![entry],
                }),
            }
        }
        groups
    }
}
