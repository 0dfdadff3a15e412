//! In-memory knowledge store.
//!
//! A store is an ordered list of embedded entries plus the company identity
//! it describes. It is immutable once built; a rebuild produces a new store
//! that is swapped in through [`StoreHandle`].

mod handle;
pub mod snapshot;

pub use handle::StoreHandle;

use crate::category::categorize;
use crate::chunker::chunk_paragraphs;
use crate::embeddings::EmbeddingProvider;
use crate::types::{Category, ChunkOptions, KnowledgeEntry, StoreMetadata, StoreStats};
use chrono::Utc;
use ragchat_core::{AppError, AppResult};

/// Label recorded as the source of stores built from in-memory paragraphs.
const INLINE_SOURCE: &str = "inline";

/// Label recorded as the source of the placeholder store.
pub const FALLBACK_SOURCE: &str = "fallback";

/// Ordered, validated collection of knowledge entries.
#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeStore {
    company_name: String,
    website: String,
    entries: Vec<KnowledgeEntry>,
    metadata: Option<StoreMetadata>,
}

impl KnowledgeStore {
    /// Create a store from entries.
    ///
    /// Fails when ids are not positive and strictly increasing, when an
    /// entry has blank content, or when embeddings are empty, non-finite or
    /// of differing lengths.
    pub fn new(
        company_name: impl Into<String>,
        website: impl Into<String>,
        entries: Vec<KnowledgeEntry>,
        metadata: Option<StoreMetadata>,
    ) -> AppResult<Self> {
        check_entries(&entries).map_err(AppError::Knowledge)?;
        Ok(Self {
            company_name: company_name.into(),
            website: website.into(),
            entries,
            metadata,
        })
    }

    /// A store with no entries.
    pub fn empty(company_name: impl Into<String>, website: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            website: website.into(),
            entries: Vec::new(),
            metadata: None,
        }
    }

    /// Placeholder store used when no source document is available: one
    /// general entry with a zero embedding, which never scores above 0.
    pub fn fallback(
        company_name: impl Into<String>,
        website: impl Into<String>,
        dimensions: usize,
    ) -> AppResult<Self> {
        let company_name = company_name.into();
        let content = format!(
            "This is a RAG chatbot for {}. Please upload the company documents to create a proper knowledge base.",
            company_name
        );
        let entry = KnowledgeEntry::new(1, content, Category::General, vec![0.0; dimensions]);
        let metadata = StoreMetadata {
            created_at: Utc::now(),
            total_entries: 1,
            source_document: FALLBACK_SOURCE.to_string(),
            source_sha256: None,
            embedding_provider: None,
            embedding_model: None,
        };

        Self::new(company_name, website, vec![entry], Some(metadata))
    }

    /// Build a store from document paragraphs.
    ///
    /// Paragraphs are chunked, chunks shorter than `options.min_chars` are
    /// dropped, and the rest are categorized and embedded in one batch.
    /// Entry ids are chunk positions counted from 1 before the drop, so
    /// they may have gaps.
    pub async fn build<S: AsRef<str>>(
        company_name: &str,
        website: &str,
        paragraphs: &[S],
        options: &ChunkOptions,
        embedder: &dyn EmbeddingProvider,
    ) -> AppResult<Self> {
        let chunks = chunk_paragraphs(paragraphs, options.max_chars);

        let kept: Vec<(u64, String)> = chunks
            .into_iter()
            .enumerate()
            .filter(|(_, chunk)| chunk.chars().count() >= options.min_chars)
            .map(|(i, chunk)| (i as u64 + 1, chunk))
            .collect();

        tracing::info!(
            "Embedding {} chunks with {} ({})",
            kept.len(),
            embedder.provider_name(),
            embedder.model_name()
        );

        let embeddings = if kept.is_empty() {
            Vec::new()
        } else {
            let texts: Vec<String> = kept.iter().map(|(_, text)| text.clone()).collect();
            embedder.embed_batch(&texts).await?
        };

        check_embeddings(&embeddings, kept.len(), embedder.dimensions())?;

        let entries: Vec<KnowledgeEntry> = kept
            .into_iter()
            .zip(embeddings)
            .map(|((id, content), embedding)| {
                let category = categorize(&content);
                KnowledgeEntry::new(id, content, category, embedding)
            })
            .collect();

        let metadata = StoreMetadata {
            created_at: Utc::now(),
            total_entries: entries.len(),
            source_document: INLINE_SOURCE.to_string(),
            source_sha256: None,
            embedding_provider: Some(embedder.provider_name().to_string()),
            embedding_model: Some(embedder.model_name().to_string()),
        };

        Self::new(company_name, website, entries, Some(metadata))
    }

    /// Record the document the store was built from.
    pub fn with_source(mut self, document: impl Into<String>, sha256: Option<String>) -> Self {
        if let Some(metadata) = self.metadata.as_mut() {
            metadata.source_document = document.into();
            metadata.source_sha256 = sha256;
        }
        self
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn website(&self) -> &str {
        &self.website
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn metadata(&self) -> Option<&StoreMetadata> {
        self.metadata.as_ref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Embedding dimension shared by all entries, `None` when empty.
    pub fn dimension(&self) -> Option<usize> {
        self.entries.first().map(|e| e.embedding.len())
    }

    /// Entry count per category, in [`Category::ALL`] order.
    pub fn category_counts(&self) -> Vec<(Category, usize)> {
        Category::ALL
            .into_iter()
            .map(|category| {
                let count = self
                    .entries
                    .iter()
                    .filter(|e| e.category == category)
                    .count();
                (category, count)
            })
            .collect()
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            company_name: self.company_name.clone(),
            website: self.website.clone(),
            total_entries: self.entries.len(),
            dimension: self.dimension(),
            categories: self.category_counts(),
            metadata: self.metadata.clone(),
        }
    }
}

/// Validate entry ids, content and embeddings.
fn check_entries(entries: &[KnowledgeEntry]) -> Result<(), String> {
    let mut previous_id = 0u64;
    let mut dimension: Option<usize> = None;

    for entry in entries {
        if entry.id == 0 {
            return Err("entry id must be positive".to_string());
        }
        if entry.id <= previous_id {
            return Err(format!(
                "entry ids must be strictly increasing ({} follows {})",
                entry.id, previous_id
            ));
        }
        previous_id = entry.id;

        if entry.content.trim().is_empty() {
            return Err(format!("entry {} has empty content", entry.id));
        }

        if entry.embedding.is_empty() {
            return Err(format!("entry {} has an empty embedding", entry.id));
        }
        if entry.embedding.iter().any(|v| !v.is_finite()) {
            return Err(format!("entry {} has a non-finite embedding value", entry.id));
        }

        match dimension {
            None => dimension = Some(entry.embedding.len()),
            Some(expected) if expected != entry.embedding.len() => {
                return Err(format!(
                    "entry {} has embedding dimension {}, expected {}",
                    entry.id,
                    entry.embedding.len(),
                    expected
                ));
            }
            Some(_) => {}
        }
    }

    Ok(())
}

/// Check that a provider returned one vector of the expected length per text.
fn check_embeddings(embeddings: &[Vec<f32>], expected_count: usize, dimensions: usize) -> AppResult<()> {
    if embeddings.len() != expected_count {
        return Err(AppError::Embedding(format!(
            "Provider returned {} embeddings for {} chunks",
            embeddings.len(),
            expected_count
        )));
    }

    for (i, embedding) in embeddings.iter().enumerate() {
        if embedding.len() != dimensions {
            return Err(AppError::Embedding(format!(
                "Embedding {} has dimension {}, expected {}",
                i,
                embedding.len(),
                dimensions
            )));
        }
        if embedding.iter().any(|v| !v.is_finite()) {
            return Err(AppError::Embedding(format!(
                "Embedding {} contains non-finite values",
                i
            )));
        }
    }

    Ok(())
}
