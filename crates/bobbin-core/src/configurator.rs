//! Per-instance plugin configuration resolution.
//!
//! [`Configurator`] is the contract for loading and storing
//! [`PluginConfiguration`] records by their `(name, type, instance)`
//! identity key. [`MemoryConfigurator`] provides the plain in-memory
//! behavior; [`EnvConfigurator`] composes it, deriving configurations from a
//! settings file on first use and caching the result for later loads.
//!
//! Derivation scans each registered plugin's settings prefix
//! (`UPPER_SNAKE(name)_`) over the parsed file, maps matching key suffixes
//! `snake_case -> CamelCase`, and files everything under the single default
//! instance name. Multi-instance addressing is a known limitation of the
//! file format, not resolved here.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use bobbin_plugin::Plugin;
use bobbin_types::{DEFAULT_PLUGIN_INSTANCE, PluginConfiguration};

use crate::env_file::{EnvFileLine, env_variable_prefix, parse_env_file, snake_to_camel};
use crate::error::{CoreError, Result};

/// Resolves per-instance settings for plugins.
pub trait Configurator {
    /// Load the configuration matching `(plugin.name, plugin.type,
    /// instance_name)`.
    fn load(&mut self, instance_name: &str, plugin: &dyn Plugin) -> Result<PluginConfiguration>;

    /// Replace the entry with the same identity key, or append a new one.
    fn store(&mut self, config: PluginConfiguration) -> Result<()>;

    /// All known configurations.
    fn load_all(&mut self) -> Result<Vec<PluginConfiguration>>;

    /// Replace the entire configuration set.
    fn store_all(&mut self, configs: Vec<PluginConfiguration>) -> Result<()>;
}

/// Plain in-memory configuration storage.
#[derive(Default)]
pub struct MemoryConfigurator {
    configs: Vec<PluginConfiguration>,
}

impl MemoryConfigurator {
    /// Create an empty configurator.
    pub fn new() -> Self {
        Self::default()
    }

    fn find(&self, name: &str, plugin: &dyn Plugin) -> Option<&PluginConfiguration> {
        self.configs
            .iter()
            .find(|config| config.matches(plugin.name(), plugin.plugin_type(), name))
    }
}

impl Configurator for MemoryConfigurator {
    fn load(&mut self, instance_name: &str, plugin: &dyn Plugin) -> Result<PluginConfiguration> {
        self.find(instance_name, plugin)
            .cloned()
            .ok_or_else(|| CoreError::ConfigurationNotFound {
                name: plugin.name().to_string(),
                instance_name: instance_name.to_string(),
            })
    }

    fn store(&mut self, config: PluginConfiguration) -> Result<()> {
        match self
            .configs
            .iter_mut()
            .find(|existing| existing.same_identity(&config))
        {
            Some(slot) => *slot = config,
            None => self.configs.push(config),
        }
        Ok(())
    }

    fn load_all(&mut self) -> Result<Vec<PluginConfiguration>> {
        Ok(self.configs.clone())
    }

    fn store_all(&mut self, configs: Vec<PluginConfiguration>) -> Result<()> {
        self.configs = configs;
        Ok(())
    }
}

/// Settings-file-backed configurator.
///
/// On the first `load`/`load_all` the settings file is parsed and one
/// configuration per matching plugin is derived and cached; later calls
/// reuse the cache without touching the file again.
pub struct EnvConfigurator {
    file_name: PathBuf,
    plugins: Vec<Arc<dyn Plugin>>,
    cache: MemoryConfigurator,
    lines: Option<Vec<EnvFileLine>>,
}

impl EnvConfigurator {
    /// Create a configurator over the given settings file, deriving entries
    /// for the given plugins.
    pub fn new(file_name: impl Into<PathBuf>, plugins: Vec<Arc<dyn Plugin>>) -> Self {
        Self {
            file_name: file_name.into(),
            plugins,
            cache: MemoryConfigurator::new(),
            lines: None,
        }
    }

    /// The parsed settings-file lines, including external override values.
    ///
    /// Parses the file on first use, like `load`/`load_all`.
    pub fn env_file_lines(&mut self) -> Result<&[EnvFileLine]> {
        self.ensure_loaded()?;
        Ok(self.lines.as_deref().unwrap_or_default())
    }

    fn ensure_loaded(&mut self) -> Result<()> {
        if self.lines.is_some() {
            return Ok(());
        }
        let lines = parse_env_file(&self.file_name)?;
        debug!(
            file = %self.file_name.display(),
            lines = lines.len(),
            "parsed settings file"
        );
        self.derive_configurations(&lines);
        self.lines = Some(lines);
        Ok(())
    }

    fn derive_configurations(&mut self, lines: &[EnvFileLine]) {
        for plugin in &self.plugins {
            let prefix = env_variable_prefix(plugin.name());
            let mut derived: Option<PluginConfiguration> = None;

            for line in lines.iter().filter(|line| line.has_prefix(&prefix)) {
                let config = derived.get_or_insert_with(|| {
                    PluginConfiguration::new(
                        plugin.name(),
                        plugin.plugin_type(),
                        DEFAULT_PLUGIN_INSTANCE,
                    )
                });
                let suffix = &line.key.as_deref().unwrap_or_default()[prefix.len()..];
                config
                    .settings
                    .insert(snake_to_camel(suffix), line.value.clone());
            }

            if let Some(config) = derived {
                debug!(
                    plugin = config.name,
                    settings = config.settings.len(),
                    "derived plugin configuration"
                );
                self.cache.configs.push(config);
            }
        }
    }
}

impl Configurator for EnvConfigurator {
    fn load(&mut self, instance_name: &str, plugin: &dyn Plugin) -> Result<PluginConfiguration> {
        self.ensure_loaded()?;
        self.cache.load(instance_name, plugin)
    }

    fn store(&mut self, config: PluginConfiguration) -> Result<()> {
        self.cache.store(config)
    }

    fn load_all(&mut self) -> Result<Vec<PluginConfiguration>> {
        self.ensure_loaded()?;
        self.cache.load_all()
    }

    fn store_all(&mut self, configs: Vec<PluginConfiguration>) -> Result<()> {
        self.cache.store_all(configs)
    }
}
