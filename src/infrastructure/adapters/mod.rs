//! Platform adapters

pub mod telegram;
pub mod console;
