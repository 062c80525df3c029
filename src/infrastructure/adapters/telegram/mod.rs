//! Telegram adapter

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::application::errors::BotError;
use crate::application::messaging::CommandParser;
use crate::domain::entities::{Caller, CommandEvent, CommandInfo};
use crate::domain::traits::{Bot, BotInfo};

/// Telegram API base URL
const API_BASE: &str = "https://api.telegram.org";

/// Telegram update type
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
}

impl Message {
    /// Command event for a `/command` text message with a known sender
    pub fn command_event(&self, parser: &CommandParser) -> Option<CommandEvent> {
        let from = self.from.as_ref()?;
        let text = self.text.as_deref()?;

        let mut caller = Caller::new(from.id);
        caller.username = from.username.clone();
        caller.first_name = from.first_name.clone();

        parser.parse(text, caller, self.chat.id)
    }
}

/// Envelope of every Bot API response
#[derive(Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Deserialize)]
struct MessageResult {
    message_id: i64,
}

/// Telegram bot adapter
pub struct TelegramAdapter {
    token: String,
    client: Client,
    info: BotInfo,
}

impl TelegramAdapter {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            client: Client::new(),
            info: BotInfo {
                id: "unknown".to_string(),
                name: "qrbot".to_string(),
                username: "qrbot".to_string(),
            },
        }
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", API_BASE, self.token, method)
    }

    /// Unwrap the `{ok, result, description}` envelope
    async fn parse_response<T: DeserializeOwned>(method: &str, response: reqwest::Response) -> Result<T, BotError> {
        let status = response.status();
        let body: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| BotError::Parse(format!("{}: {}", method, e)))?;

        if body.ok {
            return body
                .result
                .ok_or_else(|| BotError::Parse(format!("{}: response without result", method)));
        }

        let description = body.description.unwrap_or_else(|| status.to_string());
        if description.to_lowercase().contains("too long") {
            return Err(BotError::TransportLimit(description));
        }
        Err(BotError::Network(format!("Telegram API error in {}: {}", method, description)))
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, method: &str, body: &B) -> Result<T, BotError> {
        let response = self.client
            .post(self.api_url(method))
            .json(body)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        Self::parse_response(method, response).await
    }

    async fn post_form<T: DeserializeOwned>(&self, method: &str, form: Form) -> Result<T, BotError> {
        let response = self.client
            .post(self.api_url(method))
            .multipart(form)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        Self::parse_response(method, response).await
    }

    /// Fetch bot info from Telegram API
    pub async fn fetch_bot_info(&mut self) -> Result<(), BotError> {
        #[derive(Deserialize)]
        struct BotInfoResponse {
            id: i64,
            first_name: String,
            username: String,
        }

        let data: BotInfoResponse = self.post_json("getMe", &serde_json::json!({})).await?;

        self.info = BotInfo {
            id: data.id.to_string(),
            name: data.first_name,
            username: data.username,
        };

        Ok(())
    }

    /// Get updates from Telegram using getUpdates API
    pub async fn get_updates(&self, offset: i64, timeout: i64) -> Result<Vec<Update>, BotError> {
        #[derive(Serialize)]
        struct GetUpdatesRequest {
            offset: i64,
            timeout: i64,
            allowed_updates: Vec<String>,
        }

        let request = GetUpdatesRequest {
            offset,
            timeout,
            allowed_updates: vec!["message".to_string()],
        };

        self.post_json("getUpdates", &request).await
    }

    /// Get the next update offset
    pub fn get_next_offset(updates: &[Update], current: i64) -> i64 {
        updates.iter()
            .map(|u| u.update_id + 1)
            .max()
            .unwrap_or(current)
    }

    /// Publish the command menu shown by Telegram clients
    pub async fn register_commands(&self, commands: &[CommandInfo]) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct Command<'a> {
            command: &'a str,
            description: &'a str,
        }

        #[derive(Serialize)]
        struct SetMyCommandsRequest<'a> {
            commands: Vec<Command<'a>>,
        }

        let request = SetMyCommandsRequest {
            commands: commands
                .iter()
                .map(|c| Command {
                    command: &c.name,
                    description: &c.description,
                })
                .collect(),
        };

        let _: bool = self.post_json("setMyCommands", &request).await?;
        tracing::info!("Registered {} bot commands with Telegram", commands.len());
        Ok(())
    }

    /// Send chat action (typing, upload_photo, etc.)
    pub async fn send_chat_action(&self, chat_id: i64, action: &str) -> Result<(), BotError> {
        let _: bool = self
            .post_json("sendChatAction", &serde_json::json!({ "chat_id": chat_id, "action": action }))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Bot for TelegramAdapter {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<i64, BotError> {
        tracing::debug!("Sending to {}: {}", chat_id, text);

        #[derive(Serialize)]
        struct SendMessageRequest<'a> {
            chat_id: i64,
            text: &'a str,
        }

        let result: MessageResult = self
            .post_json("sendMessage", &SendMessageRequest { chat_id, text })
            .await?;
        Ok(result.message_id)
    }

    async fn send_image(&self, chat_id: i64, image: Vec<u8>, caption: &str) -> Result<(), BotError> {
        if let Err(e) = self.send_chat_action(chat_id, "upload_photo").await {
            tracing::debug!("Chat action failed: {}", e);
        }

        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", caption.to_string())
            .part("photo", Part::bytes(image).file_name("qr.png"));

        let _: MessageResult = self.post_form("sendPhoto", form).await?;
        Ok(())
    }

    async fn send_file(&self, chat_id: i64, data: Vec<u8>, filename: &str, caption: &str) -> Result<(), BotError> {
        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", caption.to_string())
            .part("document", Part::bytes(data).file_name(filename.to_string()));

        let _: MessageResult = self.post_form("sendDocument", form).await?;
        Ok(())
    }

    async fn edit_text(&self, chat_id: i64, message_id: i64, text: &str) -> Result<(), BotError> {
        let _: serde_json::Value = self
            .post_json(
                "editMessageText",
                &serde_json::json!({ "chat_id": chat_id, "message_id": message_id, "text": text }),
            )
            .await?;
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
