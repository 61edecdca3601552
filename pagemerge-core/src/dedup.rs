//! Corpus-wide exact-duplicate elimination

use crate::normalize::{hash_text, ContentHash};
use crate::record::Chunk;
use std::collections::HashSet;

/// Accumulates content hashes and rejects chunks already seen
///
/// The accumulator is owned by one deduplication pass; reuse across runs
/// is explicit.
#[derive(Debug, Clone, Default)]
pub struct Deduplicator {
    seen: HashSet<ContentHash>,
    duplicates: usize,
}

impl Deduplicator {
    /// Create an empty deduplicator
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a text, returning false when an equal text was admitted before
    pub fn admit(&mut self, text: &str) -> bool {
        let fresh = self.seen.insert(hash_text(text));
        if !fresh {
            self.duplicates += 1;
        }
        fresh
    }

    /// Keep the first occurrence of every content, preserving order
    pub fn dedup(&mut self, chunks: Vec<Chunk>) -> Vec<Chunk> {
        chunks
            .into_iter()
            .filter(|chunk| self.admit(&chunk.content))
            .collect()
    }

    /// Number of distinct contents admitted
    pub fn seen(&self) -> usize {
        self.seen.len()
    }

    /// Number of rejected duplicates
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::PageKey;

    #[test]
    fn test_keeps_first_occurrence() {
        let chunks = vec![
            Chunk::new("Hello  World", &PageKey::new("a.pdf", 0)),
            Chunk::new("Something else", &PageKey::new("a.pdf", 0)),
            Chunk::new("hello world", &PageKey::new("b.pdf", 7)),
        ];

        let mut dedup = Deduplicator::new();
        let kept = dedup.dedup(chunks);

        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].metadata.file_name, "a.pdf");
        assert_eq!(kept[1].content, "Something else");
        assert_eq!(dedup.seen(), 2);
        assert_eq!(dedup.duplicates(), 1);
    }

    #[test]
    fn test_accumulates_across_calls() {
        let mut dedup = Deduplicator::new();
        assert!(dedup.admit("same text"));
        assert!(!dedup.admit("SAME text "));
        assert!(dedup.admit("other text"));
        assert_eq!(dedup.duplicates(), 1);
    }
}
