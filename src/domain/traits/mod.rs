//! Domain traits - Abstractions for infrastructure implementations

pub mod bot;
pub mod weather;

pub use bot::{Bot, BotInfo};
pub use weather::WeatherProvider;
