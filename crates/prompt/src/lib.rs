//! Prompt system for ragchat.
//!
//! This crate provides the instruction template used by the generative
//! responder:
//! - A built-in grounded answer prompt
//! - Optional YAML overrides under `.ragchat/prompts/`
//! - Handlebars template rendering

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use loader::{default_answer_prompt, load_answer_prompt, load_prompt, ANSWER_PROMPT_ID};
pub use types::{BuiltPrompt, PromptDefinition};
