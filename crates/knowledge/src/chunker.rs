//! Paragraph-accumulating text chunking.

/// Join consecutive paragraphs into chunks of roughly `max_chars`.
///
/// Paragraphs are appended to the current chunk with a single space. When
/// appending the next paragraph would take the chunk past `max_chars`, the
/// current chunk is flushed and the paragraph starts a new one. A paragraph
/// longer than `max_chars` becomes its own oversized chunk; paragraphs are
/// never split. Lengths are counted in characters and chunks are trimmed.
pub fn chunk_paragraphs<S: AsRef<str>>(paragraphs: &[S], max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    for paragraph in paragraphs {
        let paragraph = paragraph.as_ref();
        let paragraph_chars = paragraph.chars().count();

        if current.is_empty() {
            current.push_str(paragraph);
            current_chars = paragraph_chars;
        } else if current_chars + 1 + paragraph_chars > max_chars {
            flush(&mut chunks, &current);
            current = paragraph.to_string();
            current_chars = paragraph_chars;
        } else {
            current.push(' ');
            current.push_str(paragraph);
            current_chars += 1 + paragraph_chars;
        }
    }

    flush(&mut chunks, &current);

    tracing::debug!(
        "Chunked {} paragraphs into {} chunks",
        paragraphs.len(),
        chunks.len()
    );

    chunks
}

fn flush(chunks: &mut Vec<String>, current: &str) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_paragraphs_are_joined() {
        let chunks = chunk_paragraphs(&["Alpha one.", "Beta two.", "Gamma three."], 300);
        assert_eq!(chunks, vec!["Alpha one. Beta two. Gamma three."]);
    }

    #[test]
    fn test_flush_when_limit_exceeded() {
        // "aaaa bbbb" is 9 chars; adding " cccc" would make 14 > 10
        let chunks = chunk_paragraphs(&["aaaa", "bbbb", "cccc"], 10);
        assert_eq!(chunks, vec!["aaaa bbbb", "cccc"]);
    }

    #[test]
    fn test_exact_limit_is_kept_together() {
        // "aaaa bbbbb" is exactly 10 chars
        let chunks = chunk_paragraphs(&["aaaa", "bbbbb"], 10);
        assert_eq!(chunks, vec!["aaaa bbbbb"]);
    }

    #[test]
    fn test_long_paragraph_is_not_split() {
        let long = "x".repeat(50);
        let chunks = chunk_paragraphs(&["short", long.as_str(), "tail"], 10);
        assert_eq!(chunks, vec!["short".to_string(), long, "tail".to_string()]);
    }

    #[test]
    fn test_chunks_respect_limit() {
        let paragraphs: Vec<String> = (0..40).map(|i| format!("Paragraph number {}", i)).collect();
        for chunk in chunk_paragraphs(&paragraphs, 60) {
            assert!(chunk.chars().count() <= 60, "oversized chunk: {}", chunk);
        }
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        // Each paragraph is 4 chars but 8 bytes
        let chunks = chunk_paragraphs(&["éééé", "üüüü"], 9);
        assert_eq!(chunks, vec!["éééé üüüü"]);
    }

    #[test]
    fn test_empty_input() {
        let empty: [&str; 0] = [];
        assert!(chunk_paragraphs(&empty, 300).is_empty());
    }
}
