//! JSON snapshot persistence for knowledge stores.
//!
//! Layout:
//! ```json
//! {
//!   "company_name": "MachDatum",
//!   "website": "https://www.machdatum.com/",
//!   "knowledge_base": [
//!     {"id": 1, "content": "...", "category": "services",
//!      "embedding": [0.1, ...], "metadata": {"length": 120, "word_count": 18}}
//!   ],
//!   "metadata": {"created_at": "...", "total_entries": 1, "source_document": "company.md"}
//! }
//! ```
//! The top-level `metadata` object is optional on load; a malformed one is
//! ignored with a warning.

use super::{check_entries, KnowledgeStore};
use crate::types::{Category, EntryMetadata, KnowledgeEntry, StoreMetadata};
use ragchat_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct SnapshotOut<'a> {
    company_name: &'a str,
    website: &'a str,
    knowledge_base: &'a [KnowledgeEntry],
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<&'a StoreMetadata>,
}

#[derive(Deserialize)]
struct SnapshotIn {
    company_name: String,
    website: String,
    knowledge_base: Vec<EntryIn>,
    #[serde(default)]
    metadata: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct EntryIn {
    id: u64,
    content: String,
    category: String,
    embedding: Vec<f32>,
    metadata: EntryMetadata,
}

/// Serialize a store as pretty-printed JSON.
pub fn to_json(store: &KnowledgeStore) -> AppResult<String> {
    let out = SnapshotOut {
        company_name: &store.company_name,
        website: &store.website,
        knowledge_base: &store.entries,
        metadata: store.metadata.as_ref(),
    };
    serde_json::to_string_pretty(&out).map_err(AppError::from)
}

/// Parse and validate a snapshot. Any structural problem is reported as
/// [`AppError::CorruptStore`].
pub fn from_json(json: &str) -> AppResult<KnowledgeStore> {
    let raw: SnapshotIn =
        serde_json::from_str(json).map_err(|e| AppError::CorruptStore(e.to_string()))?;

    let mut entries = Vec::with_capacity(raw.knowledge_base.len());
    for entry in raw.knowledge_base {
        let category = Category::parse(&entry.category).ok_or_else(|| {
            AppError::CorruptStore(format!(
                "entry {} has unknown category '{}'",
                entry.id, entry.category
            ))
        })?;

        entries.push(KnowledgeEntry {
            id: entry.id,
            content: entry.content,
            category,
            embedding: entry.embedding,
            metadata: entry.metadata,
        });
    }

    check_entries(&entries).map_err(AppError::CorruptStore)?;

    Ok(KnowledgeStore {
        company_name: raw.company_name,
        website: raw.website,
        entries,
        metadata: raw.metadata.and_then(store_metadata),
    })
}

/// Decode the optional top-level metadata. An unreadable object is dropped
/// rather than failing the load, since the entries alone define the store.
fn store_metadata(value: serde_json::Value) -> Option<StoreMetadata> {
    if value.is_null() {
        return None;
    }
    match serde_json::from_value(value) {
        Ok(metadata) => Some(metadata),
        Err(e) => {
            tracing::warn!("Ignoring unreadable snapshot metadata: {}", e);
            None
        }
    }
}

/// Write a snapshot, replacing any existing file atomically.
///
/// The JSON is written to a sibling temporary file which is then renamed
/// over `path`, so readers never observe a partial snapshot.
pub fn save(store: &KnowledgeStore, path: &Path) -> AppResult<()> {
    let json = to_json(store)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            AppError::Knowledge(format!("Failed to create directory {:?}: {}", parent, e))
        })?;
    }

    let temp_path = temp_path_for(path);
    fs::write(&temp_path, json).map_err(|e| {
        AppError::Knowledge(format!("Failed to write snapshot {:?}: {}", temp_path, e))
    })?;

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(AppError::Knowledge(format!(
            "Failed to replace snapshot {:?}: {}",
            path, e
        )));
    }

    tracing::info!("Saved {} entries to {:?}", store.len(), path);
    Ok(())
}

/// Load and validate a snapshot file.
pub fn load(path: &Path) -> AppResult<KnowledgeStore> {
    if !path.exists() {
        return Err(AppError::Knowledge(format!(
            "Knowledge snapshot not found: {:?}. Run 'ragchat knowledge build' first.",
            path
        )));
    }

    let json = fs::read_to_string(path)
        .map_err(|e| AppError::Knowledge(format!("Failed to read snapshot {:?}: {}", path, e)))?;

    let store = from_json(&json)?;
    tracing::info!(
        "Loaded {} entries for {} from {:?}",
        store.len(),
        store.company_name(),
        path
    );

    Ok(store)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "knowledge.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}
