use async_trait::async_trait;
use crate::application::errors::BotError;

/// Hard limit on a single text message, in characters
pub const MAX_MESSAGE_LENGTH: usize = 4096;

/// Bot trait - abstraction for messaging platform adapters
#[async_trait]
pub trait Bot: Send + Sync {
    /// Send a text message to a chat, returning the platform message id
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<i64, BotError>;

    /// Send an image with a caption
    async fn send_image(&self, chat_id: i64, image: Vec<u8>, caption: &str) -> Result<(), BotError>;

    /// Send a file attachment
    async fn send_file(&self, chat_id: i64, data: Vec<u8>, filename: &str, caption: &str) -> Result<(), BotError>;

    /// Replace the text of a message previously sent by the bot
    async fn edit_text(&self, chat_id: i64, message_id: i64, text: &str) -> Result<(), BotError>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Bot information
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
    pub username: String,
}
