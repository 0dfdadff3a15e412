//! Trigram embedding provider using hashed character trigrams.

use crate::embeddings::provider::EmbeddingProvider;
use ragchat_core::{AppError, AppResult};
use std::collections::BTreeMap;

const STOP_WORDS: &[&str] = &[
    "the", "is", "at", "which", "on", "a", "an", "as", "are", "was", "were", "for", "to", "of",
    "in", "and", "or", "but", "with", "by", "from", "this", "that", "be", "have", "has", "had",
    "it", "its", "their", "they", "them", "you", "your", "our", "can", "how", "what", "who",
];

/// Trigram-based embedding provider for local, offline operation.
///
/// Each word contributes its hashed character trigrams and a hash of the
/// whole word to a fixed number of buckets; the result is unit-normalized.
/// Deterministic and dependency-free, it gives lexical rather than semantic
/// similarity.
#[derive(Debug)]
pub struct TrigramProvider {
    dimensions: usize,
}

impl TrigramProvider {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn embed_text(&self, text: &str) -> AppResult<Vec<f32>> {
        if self.dimensions == 0 {
            return Err(AppError::Embedding(
                "Trigram provider needs at least one dimension".to_string(),
            ));
        }

        let mut embedding = vec![0.0f32; self.dimensions];

        for (word, freq) in word_frequencies(text) {
            let chars: Vec<char> = word.chars().collect();
            for window in chars.windows(3) {
                let trigram: String = window.iter().collect();
                embedding[bucket(&trigram, 37, self.dimensions)] += (freq as f32).sqrt();
            }

            embedding[bucket(&word, 31, self.dimensions)] += freq as f32;
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut embedding {
                *v /= norm;
            }
        }

        Ok(embedding)
    }
}

/// Lowercased content words with their counts. Punctuation at word edges is
/// dropped so "MachDatum?" and "machdatum" share buckets. Words come back in
/// sorted order so bucket sums are accumulated the same way on every call.
fn word_frequencies(text: &str) -> BTreeMap<String, usize> {
    let lower = text.to_lowercase();
    let mut freq = BTreeMap::new();

    for raw in lower.split_whitespace() {
        let word = raw.trim_matches(|c: char| !c.is_alphanumeric());
        if word.chars().count() > 2 && !STOP_WORDS.contains(&word) {
            *freq.entry(word.to_string()).or_insert(0) += 1;
        }
    }

    freq
}

fn bucket(token: &str, multiplier: u64, dimensions: usize) -> usize {
    let hash = token
        .bytes()
        .fold(0u64, |acc, b| acc.wrapping_mul(multiplier).wrapping_add(b as u64));
    (hash % dimensions as u64) as usize
}

#[async_trait::async_trait]
impl EmbeddingProvider for TrigramProvider {
    fn provider_name(&self) -> &str {
        "trigram"
    }

    fn model_name(&self) -> &str {
        "trigram-v1"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        texts.iter().map(|text| self.embed_text(text)).collect()
    }
}
