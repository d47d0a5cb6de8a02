//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Weather: Weather provider clients
//! - Adapters: Platform integrations (Telegram, console)

pub mod config;
pub mod weather;
pub mod adapters;
