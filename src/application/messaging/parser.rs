//! Command parser - Turns raw message text into command events

use crate::domain::entities::{Caller, CommandEvent};

/// Parses `/name[@bot] args...` text into `CommandEvent`s
pub struct CommandParser {
    bot_username: Option<String>,
}

impl CommandParser {
    pub fn new() -> Self {
        Self { bot_username: None }
    }

    /// Commands addressed as `/name@other_bot` are ignored once the own
    /// username is known
    pub fn with_bot_username(mut self, username: impl Into<String>) -> Self {
        self.bot_username = Some(username.into());
        self
    }

    /// Parse a text message; non-command text yields `None`
    pub fn parse(&self, text: &str, caller: Caller, chat_id: i64) -> Option<CommandEvent> {
        let body = text.trim_start().strip_prefix('/')?;

        let (head, rest) = match body.find(char::is_whitespace) {
            Some(idx) => body.split_at(idx),
            None => (body, ""),
        };

        let name = match head.split_once('@') {
            Some((name, target)) => {
                if let Some(own) = &self.bot_username {
                    if !target.eq_ignore_ascii_case(own) {
                        tracing::debug!("Ignoring /{} addressed to @{}", name, target);
                        return None;
                    }
                }
                name
            }
            None => head,
        };

        if name.is_empty() {
            return None;
        }

        Some(CommandEvent::new(name.to_lowercase(), rest.trim(), caller, chat_id).with_text(text))
    }
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new()
    }
}
