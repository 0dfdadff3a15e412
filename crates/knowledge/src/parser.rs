//! Source document reading and paragraph extraction.

use ragchat_core::{AppError, AppResult};
use std::fs;
use std::path::Path;

/// Content type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Markdown,
    PlainText,
    Unknown,
}

impl ContentType {
    /// Detect content type from file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("md") | Some("markdown") => Self::Markdown,
            Some("txt") | Some("text") => Self::PlainText,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::PlainText => "text",
            Self::Unknown => "unknown",
        }
    }
}

/// Read a document and return its non-empty trimmed lines.
///
/// Markdown heading markers are stripped, so `## Our Services` yields
/// `Our Services`. The order of lines is preserved.
pub fn read_paragraphs(path: &Path) -> AppResult<Vec<String>> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Knowledge(format!("Failed to read {:?}: {}", path, e)))?;

    parse_paragraphs(path, &raw)
}

/// Extract paragraphs from document text already read from `path`. The path
/// only selects the content type and labels errors.
pub fn parse_paragraphs(path: &Path, raw: &str) -> AppResult<Vec<String>> {
    let content_type = ContentType::from_path(path);
    if content_type == ContentType::Unknown && !is_likely_text(raw) {
        tracing::warn!("Refusing likely binary document: {:?}", path);
        return Err(AppError::Knowledge(format!(
            "Binary document not supported: {:?}",
            path
        )));
    }

    let paragraphs = paragraphs_from_text(raw, content_type);
    tracing::debug!(
        "Read {} paragraphs from {:?} ({})",
        paragraphs.len(),
        path,
        content_type.as_str()
    );

    Ok(paragraphs)
}

/// Split text into non-empty trimmed lines.
pub fn paragraphs_from_text(text: &str, content_type: ContentType) -> Vec<String> {
    text.lines()
        .map(|line| match content_type {
            ContentType::Markdown => line.trim().trim_start_matches('#').trim(),
            _ => line.trim(),
        })
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Check if text is likely UTF-8 text (not binary).
fn is_likely_text(data: &str) -> bool {
    !data.contains('\0')
}
