//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Services: Weather lookup pipeline and reply formatting
//! - Errors: Domain-specific errors
//! - Messaging: Message parsing and intent routing

pub mod errors;
pub mod services;
pub mod messaging;
