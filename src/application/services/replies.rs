//! Fixed reply texts

use crate::domain::entities::Reply;

pub const WELCOME: &str = "🌤️ Welcome to Weather Bot! 🌤️\n\n\
    I can help you get weather information for any city.\n\n\
    Commands:\n\
    /start - Show this welcome message\n\
    /help - Show help information\n\
    /weather <city> - Get weather for a specific city\n\n\
    You can also just send me a city name and I'll get the weather for you!";

pub const HELP: &str = "🆘 Help - Weather Bot\n\n\
    How to use:\n\
    • Send /weather followed by city name\n\
    • Example: /weather London\n\
    • Or just send: London\n\n\
    I'll provide:\n\
    • Current temperature\n\
    • Weather description\n\
    • Humidity and pressure\n\
    • Wind speed\n\
    • Feels like temperature";

pub const MISSING_CITY: &str = "Please provide a city name!\nExample: /weather London";

pub const UNKNOWN_COMMAND: &str = "Unknown command. Type /help for available commands.";

pub const LOOKUP_FAILED: &str =
    "❌ Sorry, there was an error getting the weather information. Please try again later.";

pub fn welcome() -> Reply {
    Reply::fixed(WELCOME)
}

pub fn help() -> Reply {
    Reply::fixed(HELP)
}

pub fn missing_city() -> Reply {
    Reply::fixed(MISSING_CITY)
}

pub fn unknown_command() -> Reply {
    Reply::fixed(UNKNOWN_COMMAND)
}

pub fn lookup_failed() -> Reply {
    Reply::fixed(LOOKUP_FAILED)
}

/// Apology naming the city that could not be resolved
pub fn not_found(city: &str) -> Reply {
    let text = format!(
        "❌ Sorry, I couldn't find weather information for '{}'.\n\
         Please check the city name and try again.",
        city
    );
    Reply::new(text).unwrap_or_else(lookup_failed)
}
