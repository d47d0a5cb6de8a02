use super::User;
use chrono::{DateTime, Utc};

/// Type of message content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageType {
    Text,
    Command,
}

impl MessageType {
    pub fn as_str(&self) -> &str {
        match self {
            MessageType::Text => "text",
            MessageType::Command => "command",
        }
    }
}

/// Message content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Command { name: String, args: Vec<String> },
}

impl Content {
    pub fn is_command(&self) -> bool {
        matches!(self, Content::Command { .. })
    }
}

/// Represents an incoming message
#[derive(Debug, Clone)]
pub struct Message {
    pub id: String,
    pub chat_id: String,
    pub sender: Option<User>,
    pub content: Content,
    pub message_type: MessageType,
    pub timestamp: DateTime<Utc>,
    pub platform: String,
}

impl Message {
    pub fn new(chat_id: impl Into<String>, content: Content) -> Self {
        let message_type = if content.is_command() {
            MessageType::Command
        } else {
            MessageType::Text
        };

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            chat_id: chat_id.into(),
            sender: None,
            content,
            message_type,
            timestamp: Utc::now(),
            platform: "unknown".to_string(),
        }
    }

    #[cfg(test)]
    pub fn from_text(chat_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(chat_id, Content::Text(text.into()))
    }

    #[cfg(test)]
    pub fn from_command(chat_id: impl Into<String>, name: impl Into<String>, args: Vec<String>) -> Self {
        Self::new(chat_id, Content::Command { name: name.into(), args })
    }

    pub fn with_sender_opt(mut self, user: Option<User>) -> Self {
        if let Some(u) = user {
            self.sender = Some(u);
        }
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }
}

/// Outbound reply text. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    text: String,
}

impl Reply {
    /// Builds a reply, returning `None` for blank text.
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            None
        } else {
            Some(Self { text })
        }
    }

    /// Builds a reply from one of the bot's fixed texts.
    pub(crate) fn fixed(text: &'static str) -> Self {
        debug_assert!(!text.is_empty());
        Self { text: text.to_string() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

}

impl std::fmt::Display for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type_follows_content() {
        let text = Message::from_text("1", "London");
        assert_eq!(text.message_type, MessageType::Text);
        assert!(!text.content.is_command());

        let cmd = Message::from_command("1", "weather", vec!["Paris".to_string()]);
        assert_eq!(cmd.message_type, MessageType::Command);
        assert_eq!(cmd.message_type.as_str(), "command");
        assert!(cmd.content.is_command());
    }

    #[test]
    fn test_reply_rejects_blank_text() {
        assert!(Reply::new("").is_none());
        assert!(Reply::new("  \n").is_none());
        assert_eq!(Reply::new("hi").unwrap().text(), "hi");
    }
}
