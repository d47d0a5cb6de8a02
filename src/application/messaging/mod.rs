//! Message handling - Parsing and intent routing

pub mod parser;
pub mod router;

pub use parser::MessageParser;
pub use router::IntentRouter;
