//! Plugin trait definitions

use async_trait::async_trait;

use crate::application::errors::BotError;
use crate::application::messaging::Context;
use crate::domain::entities::CommandInfo;

/// Core plugin trait that all plugins must implement
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Unique identifier for the plugin
    fn name(&self) -> &str;

    /// One-line human-readable summary
    fn describe(&self) -> &str;

    /// Commands available to everyone
    fn commands(&self) -> Vec<CommandInfo>;

    /// Commands restricted to administrators
    fn admin_commands(&self) -> Vec<CommandInfo> {
        Vec::new()
    }

    /// Handle one of the commands listed above
    async fn handle(&self, command: &str, ctx: &Context) -> Result<(), BotError>;
}

/// Error for a command name routed to a plugin that does not own it
pub fn unknown_command(plugin: &dyn Plugin, command: &str) -> BotError {
    BotError::Internal(format!("Plugin '{}' has no command /{}", plugin.name(), command))
}
