//! Application services - Business logic orchestration

pub mod format;
pub mod message_service;
pub mod replies;

pub use message_service::MessageService;
