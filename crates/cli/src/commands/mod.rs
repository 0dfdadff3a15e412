//! Command handlers for the ragchat CLI.

pub mod ask;
pub mod chat;
pub mod knowledge;
mod session;

pub use ask::AskCommand;
pub use chat::ChatCommand;
pub use knowledge::KnowledgeCommand;
