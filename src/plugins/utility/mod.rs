//! Small diagnostic commands

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

use crate::application::errors::BotError;
use crate::application::messaging::Context;
use crate::domain::entities::CommandInfo;
use crate::infrastructure::database::Database;
use crate::plugins::trait_def::{unknown_command, Plugin};

pub struct UtilityPlugin {
    db: Arc<Database>,
}

impl UtilityPlugin {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    async fn ping(&self, ctx: &Context) -> Result<(), BotError> {
        let caller = ctx.caller();
        self.db
            .upsert_user(caller.id, caller.username.as_deref(), caller.first_name.as_deref())?;
        self.db.record_command(caller.id, &ctx.event.name, "")?;

        let started = Instant::now();
        let message_id = ctx.reply_text("Pinging... ⏳").await?;
        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

        ctx.bot()
            .edit_text(ctx.chat_id(), message_id, &format!("Pong! 🏓 Latency: {:.2}ms", latency_ms))
            .await
    }
}

#[async_trait]
impl Plugin for UtilityPlugin {
    fn name(&self) -> &str {
        "utility"
    }

    fn describe(&self) -> &str {
        "Utility Plugin - Connectivity checks"
    }

    fn commands(&self) -> Vec<CommandInfo> {
        vec![CommandInfo::new("ping", "Check bot latency")]
    }

    async fn handle(&self, command: &str, ctx: &Context) -> Result<(), BotError> {
        match command {
            "ping" => self.ping(ctx).await,
            other => Err(unknown_command(self, other)),
        }
    }
}
