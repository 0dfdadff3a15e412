//! Knowledge system type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Topic label assigned to every knowledge entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Services,
    CompanyInfo,
    Contact,
    Technology,
    Team,
    General,
}

impl Category {
    /// All categories in reporting order.
    pub const ALL: [Category; 6] = [
        Category::Services,
        Category::CompanyInfo,
        Category::Contact,
        Category::Technology,
        Category::Team,
        Category::General,
    ];

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Services => "services",
            Self::CompanyInfo => "company_info",
            Self::Contact => "contact",
            Self::Technology => "technology",
            Self::Team => "team",
            Self::General => "general",
        }
    }

    /// Parse a category label, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == lower)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Size statistics stored with each entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMetadata {
    /// Content length in characters
    pub length: usize,

    /// Whitespace-separated token count
    pub word_count: usize,
}

impl EntryMetadata {
    pub fn for_content(content: &str) -> Self {
        Self {
            length: content.chars().count(),
            word_count: content.split_whitespace().count(),
        }
    }
}

/// A single retrievable unit of the knowledge base.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnowledgeEntry {
    /// Positive id, strictly increasing within a store (gaps allowed)
    pub id: u64,

    /// Chunk text
    pub content: String,

    pub category: Category,

    /// Fixed-length embedding vector
    pub embedding: Vec<f32>,

    pub metadata: EntryMetadata,
}

impl KnowledgeEntry {
    /// Create an entry, deriving its metadata from the content.
    pub fn new(id: u64, content: impl Into<String>, category: Category, embedding: Vec<f32>) -> Self {
        let content = content.into();
        let metadata = EntryMetadata::for_content(&content);
        Self {
            id,
            content,
            category,
            embedding,
            metadata,
        }
    }
}

/// Provenance recorded when a store is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreMetadata {
    pub created_at: DateTime<Utc>,

    pub total_entries: usize,

    /// Path or label of the document the store was built from
    pub source_document: String,

    /// SHA-256 hex digest of the source document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_sha256: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding_provider: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding_model: Option<String>,
}

/// Options controlling how a document is cut into entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkOptions {
    /// Accumulated chunk length (in characters) that triggers a flush
    pub max_chars: usize,

    /// Chunks shorter than this are not stored
    pub min_chars: usize,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            max_chars: 300,
            min_chars: 20,
        }
    }
}

/// Options controlling retrieval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrievalOptions {
    /// Maximum number of matches
    pub top_k: usize,

    /// Minimum similarity, inclusive
    pub threshold: f32,
}

impl Default for RetrievalOptions {
    fn default() -> Self {
        Self {
            top_k: 3,
            threshold: 0.3,
        }
    }
}

/// An entry paired with its similarity to a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredMatch<'a> {
    pub entry: &'a KnowledgeEntry,
    pub similarity: f32,
}

/// Result of one chat turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Answer text
    pub response: String,

    /// Truncated previews of the matched entries, in match order
    pub context_used: Vec<String>,

    /// Similarities of the matched entries, in match order
    pub similarity_scores: Vec<f32>,
}

/// Summary of a loaded store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreStats {
    pub company_name: String,
    pub website: String,
    pub total_entries: usize,

    /// Embedding dimension, absent for an empty store
    pub dimension: Option<usize>,

    /// Entry count per category, every category listed
    pub categories: Vec<(Category, usize)>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<StoreMetadata>,
}
