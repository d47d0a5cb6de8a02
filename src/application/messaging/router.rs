//! Intent router - Classifies messages and decides what to do with them

use crate::application::services::replies;
use crate::domain::entities::{CommandRegistry, Content, Message, Reply, WeatherQuery};

/// What the pipeline should do with a message
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Send this text back, no lookup needed
    Reply(Reply),
    /// Fetch and format the weather for this city
    LookupWeather(WeatherQuery),
}

/// Classified purpose of a message, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Start,
    Help,
    Weather,
    UnknownCommand,
    Text,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Start => "start",
            Intent::Help => "help",
            Intent::Weather => "weather",
            Intent::UnknownCommand => "unknown_command",
            Intent::Text => "text",
        }
    }
}

/// Routes messages to a static reply or a weather lookup
pub struct IntentRouter {
    commands: CommandRegistry,
}

impl IntentRouter {
    pub fn new(commands: CommandRegistry) -> Self {
        Self { commands }
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    pub fn intent(&self, message: &Message) -> Intent {
        match &message.content {
            Content::Command { name, .. } => match self.commands.find(name).map(|c| c.name.as_str()) {
                Some("start") => Intent::Start,
                Some("help") => Intent::Help,
                Some("weather") => Intent::Weather,
                _ => Intent::UnknownCommand,
            },
            Content::Text(_) => Intent::Text,
        }
    }

    pub fn route(&self, message: &Message) -> Action {
        match (self.intent(message), &message.content) {
            (Intent::Start, _) => Action::Reply(replies::welcome()),
            (Intent::Help, _) => Action::Reply(replies::help()),
            (Intent::UnknownCommand, _) => Action::Reply(replies::unknown_command()),
            (Intent::Weather, Content::Command { args, .. }) => lookup(&args.join(" ")),
            (_, Content::Text(text)) => lookup(text),
            (Intent::Text, Content::Command { .. }) => Action::Reply(replies::unknown_command()),
        }
    }
}

impl Default for IntentRouter {
    fn default() -> Self {
        Self::new(CommandRegistry::with_defaults())
    }
}

fn lookup(city: &str) -> Action {
    match WeatherQuery::new(city) {
        Ok(query) => Action::LookupWeather(query),
        Err(_) => Action::Reply(replies::missing_city()),
    }
}
