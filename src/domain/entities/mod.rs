//! Domain entities - Core business objects with no external dependencies

pub mod user;
pub mod message;
pub mod command;
pub mod weather;

pub use user::User;
pub use message::{Message, Content, Reply};
pub use command::CommandRegistry;
pub use weather::{WeatherQuery, CurrentWeather, Reading, WeatherResult};
