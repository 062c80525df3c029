//! Administrative commands

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

use crate::application::errors::{BotError, StorageError};
use crate::application::messaging::Context;
use crate::domain::entities::CommandInfo;
use crate::domain::traits::MAX_MESSAGE_LENGTH;
use crate::infrastructure::database::Database;
use crate::infrastructure::logging::latest_log_file;
use crate::plugins::trait_def::{unknown_command, Plugin};

pub const USERINFO_USAGE: &str = "Please provide a user ID. Usage: /userinfo <user_id>";
pub const INVALID_USER_ID: &str = "Invalid user ID format.";
pub const USER_NOT_FOUND: &str = "User not found.";
pub const NO_LOG_FILES: &str = "No log files found.";
pub const BROADCAST_USAGE: &str = "Please provide a message to broadcast.";

const USER_LIST_LIMIT: usize = 20;
const RECENT_COMMANDS_LIMIT: usize = 5;

pub struct AdminPlugin {
    db: Arc<Database>,
    log_dir: PathBuf,
}

impl AdminPlugin {
    pub fn new(db: Arc<Database>, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            db,
            log_dir: log_dir.into(),
        }
    }

    fn record(&self, ctx: &Context) -> Result<(), StorageError> {
        let caller = ctx.caller();
        self.db
            .upsert_user(caller.id, caller.username.as_deref(), caller.first_name.as_deref())?;
        self.db.record_command(caller.id, &ctx.event.name, &ctx.event.raw_args)
    }

    async fn show_stats(&self, ctx: &Context) -> Result<(), BotError> {
        self.record(ctx)?;
        let stats = self.db.daily_stats()?;

        let mut text = "📊 Bot Statistics:\n\n".to_string();
        text.push_str(&format!("Total users: {}\n", stats.total_users));
        text.push_str(&format!("Active today: {}\n", stats.active_today));
        text.push_str(&format!("Commands used today: {}\n", stats.commands_today));
        text.push_str(&format!("Total QR codes generated: {}", stats.total_artifacts));

        ctx.reply_text(&text).await?;
        tracing::info!("Stats requested by admin {}", ctx.caller().id);
        Ok(())
    }

    async fn list_users(&self, ctx: &Context) -> Result<(), BotError> {
        self.record(ctx)?;
        let users = self.db.all_users()?;

        if users.is_empty() {
            ctx.reply_text("No users found in database.").await?;
            return Ok(());
        }

        let mut text = "👥 Registered Users:\n\n".to_string();
        for user in users.iter().take(USER_LIST_LIMIT) {
            text.push_str(&format!("• {}\n", user.first_name.as_deref().unwrap_or("No name")));
            text.push_str(&format!("  Username: @{}\n", user.username.as_deref().unwrap_or("No username")));
            text.push_str(&format!("  ID: {}\n", user.user_id));
            text.push_str(&format!("  Last seen: {}\n", user.last_seen.as_deref().unwrap_or("Never")));
            text.push_str("───────────────\n");
        }
        text.push_str(&format!("\nTotal users: {}", users.len()));

        ctx.reply_text(&text).await?;
        tracing::info!("User list requested by admin {}", ctx.caller().id);
        Ok(())
    }

    async fn user_info(&self, ctx: &Context) -> Result<(), BotError> {
        let args = ctx.event.args();
        let Some(raw_id) = args.first() else {
            ctx.reply_text(USERINFO_USAGE).await?;
            return Ok(());
        };
        let user_id = match parse_user_id(raw_id) {
            Ok(id) => id,
            Err(e) => {
                tracing::debug!("{}", e);
                ctx.reply_text(INVALID_USER_ID).await?;
                return Ok(());
            }
        };

        self.record(ctx)?;
        let Some(stats) = self.db.user_stats(user_id)? else {
            ctx.reply_text(USER_NOT_FOUND).await?;
            return Ok(());
        };

        let mut text = "📱 User Information:\n\n".to_string();
        text.push_str(&format!("Name: {}\n", stats.first_name.as_deref().unwrap_or("No name")));
        text.push_str(&format!("Username: @{}\n", stats.username.as_deref().unwrap_or("No username")));
        text.push_str(&format!("User ID: {}\n", user_id));
        text.push_str(&format!("Commands used: {}\n", stats.commands_used));
        text.push_str(&format!("QR codes generated: {}\n", stats.artifacts_generated));
        text.push_str(&format!("Join date: {}\n", stats.join_date.as_deref().unwrap_or("Unknown")));
        text.push_str(&format!("Last seen: {}\n", stats.last_seen.as_deref().unwrap_or("Never")));

        let history = self.db.user_history(user_id)?;
        if !history.is_empty() {
            text.push_str("\nRecent commands:\n");
            for record in history.iter().take(RECENT_COMMANDS_LIMIT) {
                let invocation = format!("{} {}", record.command, record.args);
                text.push_str(&format!("• {} - {}\n", invocation.trim_end(), record.timestamp));
            }
        }

        ctx.reply_text(&text).await?;
        tracing::info!("User info requested for {} by admin {}", user_id, ctx.caller().id);
        Ok(())
    }

    async fn get_logs(&self, ctx: &Context) -> Result<(), BotError> {
        self.record(ctx)?;

        let latest = latest_log_file(&self.log_dir)
            .map_err(|e| BotError::Internal(format!("Failed to list log directory: {}", e)))?;
        let Some(path) = latest else {
            ctx.reply_text(NO_LOG_FILES).await?;
            return Ok(());
        };

        let data = tokio::fs::read(&path)
            .await
            .map_err(|e| BotError::Internal(format!("Failed to read log file {}: {}", path.display(), e)))?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "bot.log".to_string());

        ctx.reply_file(data, &filename, "Here's the latest log file.").await?;
        tracing::info!("Logs sent to admin {}", ctx.caller().id);
        Ok(())
    }

    async fn broadcast(&self, ctx: &Context) -> Result<(), BotError> {
        let message = ctx.event.args().join(" ");
        if message.is_empty() {
            ctx.reply_text(BROADCAST_USAGE).await?;
            return Ok(());
        }

        let len = message.chars().count();
        if len > MAX_MESSAGE_LENGTH {
            return Err(BotError::TransportLimit(format!(
                "broadcast of {} characters, limit is {}",
                len, MAX_MESSAGE_LENGTH
            )));
        }

        self.record(ctx)?;
        let users = self.db.all_users()?;

        let mut delivered = 0;
        let mut failed = 0;
        for user in &users {
            match ctx.bot().send_text(user.user_id, &message).await {
                Ok(_) => delivered += 1,
                Err(e) => {
                    failed += 1;
                    tracing::warn!("Broadcast to {} failed: {}", user.user_id, e);
                }
            }
        }

        ctx.reply_text(&format!("📣 Broadcast sent to {} users ({} failed).", delivered, failed))
            .await?;
        tracing::info!("Broadcast sent by admin {}", ctx.caller().id);
        Ok(())
    }
}

fn parse_user_id(raw: &str) -> Result<i64, BotError> {
    raw.parse::<i64>()
        .map_err(|_| BotError::Validation(format!("'{}' is not a user id", raw)))
}

#[async_trait]
impl Plugin for AdminPlugin {
    fn name(&self) -> &str {
        "admin"
    }

    fn describe(&self) -> &str {
        "Admin Plugin - Administrative commands"
    }

    fn commands(&self) -> Vec<CommandInfo> {
        Vec::new()
    }

    fn admin_commands(&self) -> Vec<CommandInfo> {
        vec![
            CommandInfo::new("stats", "Show bot statistics"),
            CommandInfo::new("users", "List all registered users"),
            CommandInfo::new("userinfo", "Get detailed info about a user"),
            CommandInfo::new("logs", "Get recent log files"),
            CommandInfo::new("broadcast", "Send a message to every user"),
        ]
    }

    async fn handle(&self, command: &str, ctx: &Context) -> Result<(), BotError> {
        if !ctx.admins().check_or_deny(ctx).await? {
            return Ok(());
        }

        match command {
            "stats" => self.show_stats(ctx).await,
            "users" => self.list_users(ctx).await,
            "userinfo" => self.user_info(ctx).await,
            "logs" => self.get_logs(ctx).await,
            "broadcast" => self.broadcast(ctx).await,
            other => Err(unknown_command(self, other)),
        }
    }
}
