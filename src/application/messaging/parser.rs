//! Message parser - Parses raw messages into structured messages

use once_cell::sync::Lazy;
use regex_lite::Regex;

use crate::domain::entities::{Message, Content, User};

/// Command token with an optional `@botname` suffix, as Telegram sends it in groups
static COMMAND_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([^@\s]*)(?:@\S*)?$").expect("command token pattern is valid")
});

/// Parses incoming messages into structured Message objects
pub struct MessageParser {
    command_prefix: String,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
        }
    }

    /// Parse a text message
    pub fn parse(&self, chat_id: impl Into<String>, text: impl Into<String>, sender: Option<User>) -> Message {
        let text = text.into();
        let chat_id = chat_id.into();

        if self.is_command(&text) {
            return self.parse_command(chat_id, &text, sender);
        }

        Message::new(chat_id, Content::Text(text)).with_sender_opt(sender)
    }

    fn is_command(&self, text: &str) -> bool {
        text.starts_with('/')
            || (!self.command_prefix.is_empty() && text.starts_with(&self.command_prefix))
    }

    /// Parse a command message
    fn parse_command(&self, chat_id: String, text: &str, sender: Option<User>) -> Message {
        // Remove the command prefix (either / or custom prefix)
        let cmd_text = match text.strip_prefix('/') {
            Some(rest) => rest,
            None => text.strip_prefix(self.command_prefix.as_str()).unwrap_or(text),
        };

        // Split command and arguments
        let mut parts = cmd_text.split_whitespace();
        let token = if cmd_text.starts_with(char::is_whitespace) {
            ""
        } else {
            parts.next().unwrap_or("")
        };
        let name = COMMAND_TOKEN
            .captures(token)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .unwrap_or(token)
            .to_string();
        let args = parts.map(|s| s.to_string()).collect();

        Message::new(chat_id, Content::Command { name, args }).with_sender_opt(sender)
    }
}
