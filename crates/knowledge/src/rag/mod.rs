//! Retrieval-augmented answering.
//!
//! A [`Chatbot`] embeds the question, retrieves matching entries and hands
//! them to a [`Responder`], which turns them into answer text either by
//! deterministic formatting or through an LLM.

pub mod chat;
pub mod generative;
pub mod responder;
pub mod templated;

pub use chat::{preview, ChatOptions, Chatbot};
pub use generative::GenerativeResponder;
pub use responder::{no_information_message, Responder};
pub use templated::TemplatedResponder;
