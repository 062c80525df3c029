//! Plugin manager - holds the plugins composed into the runtime

use std::sync::Arc;
use tracing::info;

use crate::application::errors::BotError;
use crate::plugins::trait_def::Plugin;

/// Ordered set of plugins, unique by name
#[derive(Default)]
pub struct PluginManager {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl PluginManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin
    pub fn register<P: Plugin + 'static>(&mut self, plugin: P) -> Result<(), BotError> {
        let name = plugin.name().to_string();

        if self.has_plugin(&name) {
            return Err(BotError::Config(format!("Plugin '{}' already registered", name)));
        }

        info!("Registering plugin: {}", name);
        self.plugins.push(Arc::new(plugin));
        Ok(())
    }

    /// Plugins in registration order
    pub fn plugins(&self) -> &[Arc<dyn Plugin>] {
        &self.plugins
    }

    /// List all registered plugins
    pub fn list_plugins(&self) -> Vec<PluginInfo> {
        self.plugins
            .iter()
            .map(|plugin| PluginInfo {
                name: plugin.name().to_string(),
                description: plugin.describe().to_string(),
                commands: plugin.commands().len(),
                admin_commands: plugin.admin_commands().len(),
            })
            .collect()
    }

    /// Check if a plugin exists
    pub fn has_plugin(&self, name: &str) -> bool {
        self.plugins.iter().any(|p| p.name() == name)
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

/// Plugin information for listing
#[derive(Debug, Clone, serde::Serialize)]
pub struct PluginInfo {
    pub name: String,
    pub description: String,
    pub commands: usize,
    pub admin_commands: usize,
}
