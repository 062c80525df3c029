//! Console adapter for development/testing

use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::application::errors::BotError;
use crate::domain::traits::{Bot, BotInfo};

/// Console bot adapter for local development
pub struct ConsoleAdapter {
    info: BotInfo,
    next_message_id: AtomicI64,
}

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self {
            info: BotInfo {
                id: "console".to_string(),
                name: "qrbot".to_string(),
                username: "console".to_string(),
            },
            next_message_id: AtomicI64::new(1),
        }
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn send_text(&self, _chat_id: i64, text: &str) -> Result<i64, BotError> {
        println!("[BOT] {}", text);
        Ok(self.next_message_id.fetch_add(1, Ordering::Relaxed))
    }

    async fn send_image(&self, _chat_id: i64, image: Vec<u8>, caption: &str) -> Result<(), BotError> {
        println!("[BOT] <image, {} bytes> {}", image.len(), caption);
        Ok(())
    }

    async fn send_file(&self, _chat_id: i64, data: Vec<u8>, filename: &str, caption: &str) -> Result<(), BotError> {
        println!("[BOT] <file {}, {} bytes> {}", filename, data.len(), caption);
        Ok(())
    }

    async fn edit_text(&self, _chat_id: i64, message_id: i64, text: &str) -> Result<(), BotError> {
        println!("[BOT] (edited #{}) {}", message_id, text);
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
