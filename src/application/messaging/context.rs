//! Per-command context handed to handlers

use std::sync::Arc;

use crate::application::errors::BotError;
use crate::application::services::AdminGate;
use crate::domain::entities::{Caller, CommandEvent};
use crate::domain::traits::{Bot, MAX_MESSAGE_LENGTH};

/// The inbound event plus the means to answer it
pub struct Context {
    pub event: CommandEvent,
    bot: Arc<dyn Bot>,
    admins: Arc<AdminGate>,
}

impl Context {
    pub fn new(event: CommandEvent, bot: Arc<dyn Bot>, admins: Arc<AdminGate>) -> Self {
        Self { event, bot, admins }
    }

    pub fn caller(&self) -> &Caller {
        &self.event.caller
    }

    pub fn chat_id(&self) -> i64 {
        self.event.chat_id
    }

    pub fn bot(&self) -> &Arc<dyn Bot> {
        &self.bot
    }

    pub fn admins(&self) -> &AdminGate {
        &self.admins
    }

    pub fn is_admin(&self) -> bool {
        self.admins.is_admin(self.caller().id)
    }

    /// Reply with text, rejecting anything over the platform limit
    pub async fn reply_text(&self, text: &str) -> Result<i64, BotError> {
        let len = text.chars().count();
        if len > MAX_MESSAGE_LENGTH {
            return Err(BotError::TransportLimit(format!(
                "{} characters, limit is {}",
                len, MAX_MESSAGE_LENGTH
            )));
        }
        self.bot.send_text(self.event.chat_id, text).await
    }

    pub async fn reply_image(&self, image: Vec<u8>, caption: &str) -> Result<(), BotError> {
        self.bot.send_image(self.event.chat_id, image, caption).await
    }

    pub async fn reply_file(&self, data: Vec<u8>, filename: &str, caption: &str) -> Result<(), BotError> {
        self.bot.send_file(self.event.chat_id, data, filename, caption).await
    }
}
