/// Represents a bot command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    pub description: Option<String>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn matches(&self, input: &str) -> bool {
        self.name.eq_ignore_ascii_case(input)
    }
}

/// Command registry for the commands the bot understands.
/// Keeps registration order so the platform menu is stable.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The start, help and weather commands
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Command::new("start").with_description("Show the welcome message"));
        registry.register(Command::new("help").with_description("Show help information"));
        registry.register(Command::new("weather").with_description("Get weather for a specific city"));
        registry
    }

    /// Registers a command, replacing any existing one with the same name
    pub fn register(&mut self, command: Command) {
        self.commands.retain(|c| c.name != command.name);
        self.commands.push(command);
    }

    pub fn find(&self, input: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.matches(input))
    }

    pub fn all(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }
}
