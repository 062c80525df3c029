//! Command dispatcher - Routes command events to plugin handlers

use std::collections::HashMap;
use std::sync::Arc;

use super::Context;
use crate::application::errors::BotError;
use crate::domain::entities::CommandInfo;
use crate::infrastructure::database::Database;
use crate::plugins::Plugin;

/// Commands answered by the dispatcher itself
const BUILTIN_COMMANDS: [(&str, &str); 2] = [
    ("start", "Show this help message"),
    ("help", "Show this help message"),
];

enum Route {
    Help,
    Plugin(Arc<dyn Plugin>),
}

/// Maps command names to the plugin that owns them
pub struct Dispatcher {
    routes: HashMap<String, Route>,
    plugins: Vec<Arc<dyn Plugin>>,
    db: Arc<Database>,
}

impl Dispatcher {
    pub fn new(db: Arc<Database>) -> Self {
        let routes = BUILTIN_COMMANDS
            .iter()
            .map(|(name, _)| (name.to_string(), Route::Help))
            .collect();

        Self {
            routes,
            plugins: Vec::new(),
            db,
        }
    }

    /// Bind every general and administrator command of `plugin`.
    ///
    /// Fails without registering anything if one of its names is taken.
    pub fn register_plugin(&mut self, plugin: Arc<dyn Plugin>) -> Result<(), BotError> {
        let names: Vec<String> = plugin
            .commands()
            .into_iter()
            .chain(plugin.admin_commands())
            .map(|c| c.name)
            .collect();

        for (i, name) in names.iter().enumerate() {
            if self.routes.contains_key(name) || names[..i].contains(name) {
                return Err(BotError::Config(format!(
                    "Command /{} from plugin '{}' is already registered",
                    name,
                    plugin.name()
                )));
            }
        }

        for name in names {
            tracing::info!("Registered command /{} -> {}", name, plugin.name());
            self.routes.insert(name, Route::Plugin(plugin.clone()));
        }
        self.plugins.push(plugin);
        Ok(())
    }

    pub fn plugins(&self) -> &[Arc<dyn Plugin>] {
        &self.plugins
    }

    /// Run the handler for `ctx.event`; `Ok(false)` when no handler exists
    pub async fn dispatch(&self, ctx: &Context) -> Result<bool, BotError> {
        let Some(route) = self.routes.get(&ctx.event.name) else {
            tracing::debug!("No handler for /{}", ctx.event.name);
            return Ok(false);
        };

        match route {
            Route::Help => self.start(ctx).await?,
            Route::Plugin(plugin) => plugin.handle(&ctx.event.name, ctx).await?,
        }
        Ok(true)
    }

    async fn start(&self, ctx: &Context) -> Result<(), BotError> {
        let caller = ctx.caller();
        self.db
            .upsert_user(caller.id, caller.username.as_deref(), caller.first_name.as_deref())?;
        self.db.record_command(caller.id, &ctx.event.name, "")?;

        tracing::info!("Command /{} used by {}", ctx.event.name, caller);

        ctx.reply_text(&self.help_text(ctx.is_admin())).await?;
        Ok(())
    }

    /// Help listing; administrator commands only for administrators
    pub fn help_text(&self, is_admin: bool) -> String {
        let mut help = "Available commands:\n".to_string();
        help.push_str(&format!("/{} - {}\n", BUILTIN_COMMANDS[0].0, BUILTIN_COMMANDS[0].1));

        for plugin in &self.plugins {
            for cmd in plugin.commands() {
                help.push_str(&format!("/{} - {}\n", cmd.name, cmd.description));
            }
        }

        if is_admin {
            help.push_str("\n👑 Admin commands:\n");
            for plugin in &self.plugins {
                for cmd in plugin.admin_commands() {
                    help.push_str(&format!("/{} - {}\n", cmd.name, cmd.description));
                }
            }
        }
        help
    }

    /// Commands everyone may use, for publishing to the platform menu
    pub fn public_commands(&self) -> Vec<CommandInfo> {
        BUILTIN_COMMANDS
            .iter()
            .map(|(name, desc)| CommandInfo::new(*name, *desc))
            .chain(self.plugins.iter().flat_map(|p| p.commands()))
            .collect()
    }
}
