use super::Caller;

/// An inbound command as delivered by a transport adapter
#[derive(Debug, Clone)]
pub struct CommandEvent {
    /// Lowercased command name without the leading `/` or `@botname` suffix
    pub name: String,
    /// Everything after the command name, untouched
    pub raw_args: String,
    pub caller: Caller,
    pub chat_id: i64,
    /// Full message text, kept for diagnostics
    pub text: String,
}

impl CommandEvent {
    pub fn new(name: impl Into<String>, raw_args: impl Into<String>, caller: Caller, chat_id: i64) -> Self {
        let name = name.into();
        let raw_args = raw_args.into();
        let text = if raw_args.is_empty() {
            format!("/{}", name)
        } else {
            format!("/{} {}", name, raw_args)
        };
        Self {
            name,
            raw_args,
            caller,
            chat_id,
            text,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Whitespace-separated argument tokens
    pub fn args(&self) -> Vec<&str> {
        self.raw_args.split_whitespace().collect()
    }
}

/// Name and help text of a command a plugin exposes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInfo {
    pub name: String,
    pub description: String,
}

impl CommandInfo {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}
