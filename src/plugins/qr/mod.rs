//! QR code generation commands

use async_trait::async_trait;
use std::sync::Arc;

use crate::application::errors::BotError;
use crate::application::messaging::text::preview;
use crate::application::messaging::Context;
use crate::domain::entities::CommandInfo;
use crate::domain::traits::Renderer;
use crate::infrastructure::database::Database;
use crate::plugins::trait_def::{unknown_command, Plugin};

pub const USAGE: &str = "Please provide text after the command. Example: /generate Hello World";
pub const RENDER_FAILED: &str = "Sorry, there was an error generating the QR code.";

const CAPTION_PREVIEW_CHARS: usize = 100;
const HISTORY_LIMIT: usize = 10;

pub struct QrPlugin {
    db: Arc<Database>,
    renderer: Arc<dyn Renderer>,
}

impl QrPlugin {
    pub fn new(db: Arc<Database>, renderer: Arc<dyn Renderer>) -> Self {
        Self { db, renderer }
    }

    async fn generate(&self, ctx: &Context) -> Result<(), BotError> {
        let args = ctx.event.args();
        if args.is_empty() {
            ctx.reply_text(USAGE).await?;
            return Ok(());
        }

        let text = args.join(" ");
        self.db
            .record_artifact_request(ctx.caller(), &ctx.event.name, &text, &text)?;

        tracing::info!("Generating QR code for text: {}", preview(&text, 30));

        let renderer = self.renderer.clone();
        let input = text.clone();
        let rendered = tokio::task::spawn_blocking(move || renderer.render(&input))
            .await
            .map_err(|e| BotError::Internal(format!("Render task failed: {}", e)))?;

        match rendered {
            Ok(png) => {
                let caption = format!("QR Code for: {}", preview(&text, CAPTION_PREVIEW_CHARS));
                ctx.reply_image(png, &caption).await?;
                tracing::info!("QR code generated and sent to {}", ctx.caller().id);
            }
            Err(e) => {
                tracing::error!("Error generating QR code: {}", e);
                ctx.reply_text(RENDER_FAILED).await?;
            }
        }
        Ok(())
    }

    async fn history(&self, ctx: &Context) -> Result<(), BotError> {
        let caller = ctx.caller();
        self.db
            .upsert_user(caller.id, caller.username.as_deref(), caller.first_name.as_deref())?;
        self.db.record_command(caller.id, &ctx.event.name, &ctx.event.raw_args)?;

        let history = self.db.artifact_history(caller.id)?;
        if history.is_empty() {
            ctx.reply_text("You haven't generated any QR codes yet.").await?;
            return Ok(());
        }

        let mut text = "🧾 Your recent QR codes:\n\n".to_string();
        for record in history.iter().take(HISTORY_LIMIT) {
            text.push_str(&format!("• {} - {}\n", preview(&record.content, 50), record.timestamp));
        }
        if history.len() > HISTORY_LIMIT {
            text.push_str(&format!("\nTotal: {}", history.len()));
        }

        ctx.reply_text(&text).await?;
        Ok(())
    }
}

#[async_trait]
impl Plugin for QrPlugin {
    fn name(&self) -> &str {
        "qr"
    }

    fn describe(&self) -> &str {
        "QR Code Generator Plugin - Generate QR codes from text"
    }

    fn commands(&self) -> Vec<CommandInfo> {
        vec![
            CommandInfo::new("generate", "Generate QR code from text"),
            CommandInfo::new("history", "Show your recent QR codes"),
        ]
    }

    async fn handle(&self, command: &str, ctx: &Context) -> Result<(), BotError> {
        match command {
            "generate" => self.generate(ctx).await,
            "history" => self.history(ctx).await,
            other => Err(unknown_command(self, other)),
        }
    }
}
