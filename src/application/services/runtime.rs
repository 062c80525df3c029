//! Bot runtime - wires plugins into the dispatcher and owns failure handling

use std::sync::Arc;

use crate::application::errors::{error_chain, BotError};
use crate::application::messaging::text::truncate_chars;
use crate::application::messaging::{Context, Dispatcher};
use crate::application::services::AdminGate;
use crate::domain::entities::CommandEvent;
use crate::domain::traits::Bot;
use crate::infrastructure::database::Database;
use crate::plugins::PluginManager;

pub const DATABASE_ERROR_REPLY: &str = "😕 Database error occurred. Please try again later.";
pub const TOO_LONG_REPLY: &str = "⚠️ Response is too long. Please try a more specific request.";
pub const GENERIC_ERROR_REPLY: &str = "😔 An error occurred while processing your request. Please try again later.";

/// Upper bound for the diagnostic sent to administrators
const ADMIN_REPORT_LIMIT: usize = 4000;

/// How a single inbound event ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No handler for the command name
    Ignored,
    Succeeded,
    /// The handler failed; the caller got a fallback reply
    Failed,
}

pub struct BotRuntime {
    dispatcher: Dispatcher,
    bot: Arc<dyn Bot>,
    admins: Arc<AdminGate>,
}

impl BotRuntime {
    pub fn new(
        bot: Arc<dyn Bot>,
        db: Arc<Database>,
        admins: Arc<AdminGate>,
        plugins: &PluginManager,
    ) -> Result<Self, BotError> {
        let mut dispatcher = Dispatcher::new(db);
        for plugin in plugins.plugins() {
            dispatcher.register_plugin(plugin.clone())?;
            tracing::info!("Registered plugin: {}", plugin.describe());
        }
        tracing::info!("Loaded {} plugins", dispatcher.plugins().len());

        Ok(Self {
            dispatcher,
            bot,
            admins,
        })
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn bot(&self) -> &Arc<dyn Bot> {
        &self.bot
    }

    /// Dispatch one event. Handler errors never escape: the caller gets one
    /// fallback reply and administrators get a diagnostic.
    pub async fn handle_event(&self, event: CommandEvent) -> DispatchOutcome {
        let ctx = Context::new(event, self.bot.clone(), self.admins.clone());

        match self.dispatcher.dispatch(&ctx).await {
            Ok(true) => DispatchOutcome::Succeeded,
            Ok(false) => DispatchOutcome::Ignored,
            Err(e) => {
                self.report_failure(&ctx.event, &e).await;
                DispatchOutcome::Failed
            }
        }
    }

    async fn report_failure(&self, event: &CommandEvent, err: &BotError) {
        let chain = error_chain(err);
        tracing::error!(
            user_id = event.caller.id,
            chat_id = event.chat_id,
            text = %event.text,
            "Command /{} failed: {}",
            event.name,
            chain
        );

        if let Err(e) = self.bot.send_text(event.chat_id, failure_reply(err)).await {
            tracing::error!("Failed to send error reply to chat {}: {}", event.chat_id, e);
        }

        let report = format!(
            "❌ Error for user {}:\nCommand: {}\nError: {}",
            event.caller.id, event.text, chain
        );
        let report = truncate_chars(&report, ADMIN_REPORT_LIMIT);

        for admin_id in self.admins.ids() {
            if let Err(e) = self.bot.send_text(admin_id, report).await {
                tracing::error!("Failed to notify admin {}: {}", admin_id, e);
            }
        }
    }
}

/// User-facing text for an error that reached the runtime
pub fn failure_reply(err: &BotError) -> &'static str {
    match err {
        BotError::Storage(_) => DATABASE_ERROR_REPLY,
        BotError::TransportLimit(_) => TOO_LONG_REPLY,
        _ => GENERIC_ERROR_REPLY,
    }
}
