//! Fakes shared by unit and integration tests

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use crate::application::errors::{BotError, RenderError};
use crate::domain::traits::{Bot, BotInfo, Renderer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text { chat_id: i64, text: String },
    Image { chat_id: i64, bytes: Vec<u8>, caption: String },
    File { chat_id: i64, bytes: Vec<u8>, filename: String, caption: String },
    Edit { chat_id: i64, message_id: i64, text: String },
}

/// Records every outbound call; chats in `failing` reject sends
#[derive(Default)]
pub struct RecordingBot {
    sent: Mutex<Vec<Sent>>,
    failing: HashSet<i64>,
}

impl RecordingBot {
    pub fn failing_for(chats: impl IntoIterator<Item = i64>) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: chats.into_iter().collect(),
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.log().clone()
    }

    /// Text messages delivered to `chat_id`, oldest first
    pub fn texts_to(&self, chat_id: i64) -> Vec<String> {
        self.log()
            .iter()
            .filter_map(|s| match s {
                Sent::Text { chat_id: c, text } if *c == chat_id => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn log(&self) -> MutexGuard<'_, Vec<Sent>> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns the message id, which is the position in the log
    fn push(&self, chat_id: i64, sent: Sent) -> Result<i64, BotError> {
        if self.failing.contains(&chat_id) {
            return Err(BotError::Network(format!("chat {} unreachable", chat_id)));
        }
        let mut log = self.log();
        log.push(sent);
        Ok(log.len() as i64)
    }
}

#[async_trait]
impl Bot for RecordingBot {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<i64, BotError> {
        self.push(chat_id, Sent::Text { chat_id, text: text.to_string() })
    }

    async fn send_image(&self, chat_id: i64, image: Vec<u8>, caption: &str) -> Result<(), BotError> {
        self.push(chat_id, Sent::Image { chat_id, bytes: image, caption: caption.to_string() })?;
        Ok(())
    }

    async fn send_file(&self, chat_id: i64, data: Vec<u8>, filename: &str, caption: &str) -> Result<(), BotError> {
        self.push(
            chat_id,
            Sent::File {
                chat_id,
                bytes: data,
                filename: filename.to_string(),
                caption: caption.to_string(),
            },
        )?;
        Ok(())
    }

    async fn edit_text(&self, chat_id: i64, message_id: i64, text: &str) -> Result<(), BotError> {
        self.push(chat_id, Sent::Edit { chat_id, message_id, text: text.to_string() })?;
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        BotInfo {
            id: "0".to_string(),
            name: "test".to_string(),
            username: "test_bot".to_string(),
        }
    }
}

/// Renderer returning the input bytes, or failing on demand
pub struct FakeRenderer {
    pub fail: bool,
}

impl Renderer for FakeRenderer {
    fn render(&self, text: &str) -> Result<Vec<u8>, RenderError> {
        if self.fail {
            return Err(RenderError::Encode("data too long".to_string()));
        }
        Ok(text.as_bytes().to_vec())
    }
}
