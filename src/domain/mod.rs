//! Domain layer - Core business logic with no external dependencies
//!
//! This layer contains:
//! - Entities: Core business objects (Message, Command, WeatherQuery, WeatherResult)
//! - Traits: Abstractions for infrastructure (Bot, WeatherProvider)

pub mod entities;
pub mod traits;
