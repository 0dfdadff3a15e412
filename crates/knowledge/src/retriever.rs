//! Cosine-similarity retrieval over a knowledge store.

use crate::store::KnowledgeStore;
use crate::types::ScoredMatch;

/// Cosine similarity between two vectors.
///
/// Returns 0.0 for vectors of different length or when either has zero
/// magnitude. Accumulates in f64.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a.sqrt() * norm_b.sqrt())) as f32
}

/// Score every entry against `query` and return the best `top_k` whose
/// similarity is at least `threshold`, highest first.
///
/// Ties keep store order. A NaN similarity never passes the threshold.
pub fn retrieve<'a>(
    query: &[f32],
    store: &'a KnowledgeStore,
    top_k: usize,
    threshold: f32,
) -> Vec<ScoredMatch<'a>> {
    if top_k == 0 {
        return Vec::new();
    }

    // Qualifying entries form a prefix of the full ranking
    let mut matches: Vec<ScoredMatch<'a>> = store
        .entries()
        .iter()
        .map(|entry| ScoredMatch {
            entry,
            similarity: cosine_similarity(query, &entry.embedding),
        })
        .filter(|m| m.similarity >= threshold)
        .collect();

    // Stable sort keeps store order among equal scores
    matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    matches.truncate(top_k);

    tracing::debug!(
        "Retrieved {} of {} entries (top_k={}, threshold={:.2}): {:?}",
        matches.len(),
        store.len(),
        top_k,
        threshold,
        matches.iter().map(|m| m.similarity).collect::<Vec<_>>()
    );

    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, KnowledgeEntry};

    fn store(embeddings: &[[f32; 3]]) -> KnowledgeStore {
        let entries = embeddings
            .iter()
            .enumerate()
            .map(|(i, e)| {
                KnowledgeEntry::new(
                    i as u64 + 1,
                    format!("Entry number {}", i + 1),
                    Category::General,
                    e.to_vec(),
                )
            })
            .collect();
        KnowledgeStore::new("MachDatum", "https://www.machdatum.com/", entries, None).unwrap()
    }

    #[test]
    fn test_cosine_basics() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_degenerate_inputs() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn test_identical_vector_ranks_first() {
        let store = store(&[[0.0, 1.0, 0.0], [0.2, 0.9, 0.1], [0.3, 0.3, 0.9]]);
        let query = store.entries()[2].embedding.clone();

        let matches = retrieve(&query, &store, 3, 0.0);
        assert_eq!(matches[0].entry.id, 3);
        assert!((matches[0].similarity - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_sorted_bounded_and_thresholded() {
        let store = store(&[
            [1.0, 0.0, 0.0],
            [0.9, 0.1, 0.0],
            [0.0, 1.0, 0.0],
            [0.7, 0.7, 0.0],
            [0.0, 0.0, 1.0],
        ]);

        let matches = retrieve(&[1.0, 0.0, 0.0], &store, 3, 0.3);
        assert_eq!(matches.len(), 3);
        assert_eq!(
            matches.iter().map(|m| m.entry.id).collect::<Vec<_>>(),
            vec![1, 2, 4]
        );
        for pair in matches.windows(2) {
            assert!(pair[0].similarity >= pair[1].similarity);
        }
        assert!(matches.iter().all(|m| m.similarity >= 0.3));
    }

    #[test]
    fn test_threshold_excludes_weak_matches() {
        let store = store(&[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let matches = retrieve(&[1.0, 0.0, 0.0], &store, 2, 0.5);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].entry.id, 1);
    }

    #[test]
    fn test_ties_keep_store_order() {
        let store = store(&[[0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        let matches = retrieve(&[1.0, 0.0, 0.0], &store, 2, 0.0);
        assert_eq!(
            matches.iter().map(|m| m.entry.id).collect::<Vec<_>>(),
            vec![2, 3]
        );
    }

    #[test]
    fn test_top_k_zero_and_empty_store() {
        let populated = store(&[[1.0, 0.0, 0.0]]);
        assert!(retrieve(&[1.0, 0.0, 0.0], &populated, 0, 0.0).is_empty());

        let empty = KnowledgeStore::empty("MachDatum", "https://www.machdatum.com/");
        assert!(retrieve(&[1.0, 0.0, 0.0], &empty, 3, 0.0).is_empty());
    }

    #[test]
    fn test_nan_query_never_matches() {
        let store = store(&[[1.0, 0.0, 0.0]]);
        assert!(retrieve(&[f32::NAN, 0.0, 0.0], &store, 3, -1.0).is_empty());
    }
}
