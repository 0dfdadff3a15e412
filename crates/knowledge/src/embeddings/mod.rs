//! Embedding providers for knowledge entries and queries.
//!
//! Every provider maps text to a fixed-length vector. The same provider
//! (and dimension) must be used for a store and the queries run against it.

pub mod provider;
pub mod providers;

pub use provider::{create_provider, EmbeddingProvider};
