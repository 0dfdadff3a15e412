//! Company knowledge base and retrieval-augmented chat.
//!
//! Builds an embedded knowledge store from a company document, persists it
//! as a JSON snapshot, and answers questions by cosine retrieval followed by
//! a templated or LLM-generated response.

pub mod category;
pub mod chunker;
pub mod embeddings;
pub mod parser;
pub mod rag;
pub mod retriever;
pub mod store;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use embeddings::{create_provider, EmbeddingProvider};
pub use rag::{ChatOptions, Chatbot, GenerativeResponder, Responder, TemplatedResponder};
pub use store::{KnowledgeStore, StoreHandle};
pub use types::{
    Category, ChatResponse, ChunkOptions, EntryMetadata, KnowledgeEntry, RetrievalOptions,
    ScoredMatch, StoreMetadata, StoreStats,
};

use ragchat_core::{AppError, AppResult};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::time::Instant;

/// Company identity attached to a built store.
#[derive(Debug, Clone, Copy)]
pub struct Company<'a> {
    pub name: &'a str,
    pub website: &'a str,
}

/// How [`ensure_store`] obtained its store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// An existing snapshot was loaded
    Loaded,
    /// The snapshot was built from the source document
    Built,
    /// No document was available; a placeholder store was written
    Fallback,
}

impl EnsureOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loaded => "loaded",
            Self::Built => "built",
            Self::Fallback => "fallback",
        }
    }
}

/// Read a document and build a store from it.
///
/// The store's metadata records the document path and its SHA-256 digest.
pub async fn build_from_document(
    document: &Path,
    company: Company<'_>,
    options: &ChunkOptions,
    embedder: &dyn EmbeddingProvider,
) -> AppResult<KnowledgeStore> {
    tracing::info!("Building knowledge store from {:?}", document);

    let raw = std::fs::read(document)
        .map_err(|e| AppError::Knowledge(format!("Failed to read {:?}: {}", document, e)))?;

    build_from_bytes(document, &raw, company, options, embedder).await
}

/// Build a store from the contents of `document`, already read into `raw`.
///
/// The digest and the paragraphs both come from `raw`, so the recorded
/// SHA-256 always matches what was indexed.
pub async fn build_from_bytes(
    document: &Path,
    raw: &[u8],
    company: Company<'_>,
    options: &ChunkOptions,
    embedder: &dyn EmbeddingProvider,
) -> AppResult<KnowledgeStore> {
    let start = Instant::now();
    let digest = format!("{:x}", Sha256::digest(raw));

    let text = std::str::from_utf8(raw).map_err(|e| {
        AppError::Knowledge(format!("Document {:?} is not valid UTF-8: {}", document, e))
    })?;
    let paragraphs = parser::parse_paragraphs(document, text)?;

    let store = KnowledgeStore::build(company.name, company.website, &paragraphs, options, embedder)
        .await?
        .with_source(document.display().to_string(), Some(digest));

    tracing::info!(
        "Built {} entries from {} paragraphs in {:.2}s",
        store.len(),
        paragraphs.len(),
        start.elapsed().as_secs_f64()
    );

    Ok(store)
}

/// Make sure a snapshot exists at `snapshot`, returning the store it holds.
///
/// An existing snapshot is loaded (and must be valid). Otherwise the store is
/// built from `document` when that file exists, or a placeholder store with
/// one zero-embedding entry is created; either way it is saved.
pub async fn ensure_store(
    snapshot: &Path,
    document: &Path,
    company: Company<'_>,
    options: &ChunkOptions,
    embedder: &dyn EmbeddingProvider,
) -> AppResult<(KnowledgeStore, EnsureOutcome)> {
    if snapshot.exists() {
        return Ok((store::snapshot::load(snapshot)?, EnsureOutcome::Loaded));
    }

    let (store, outcome) = if document.exists() {
        let store = build_from_document(document, company, options, embedder).await?;
        (store, EnsureOutcome::Built)
    } else {
        tracing::warn!(
            "Source document {:?} not found, writing a placeholder knowledge store",
            document
        );
        let store =
            KnowledgeStore::fallback(company.name, company.website, embedder.dimensions())?;
        (store, EnsureOutcome::Fallback)
    };

    store::snapshot::save(&store, snapshot)?;
    Ok((store, outcome))
}
