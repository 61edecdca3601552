//! Sentence-aware rechunking with overlap
//!
//! A page is cut into segments, greedily packed up to the target length,
//! and consecutive chunks of the page share a tail of `overlap` characters
//! so a boundary does not cut context away. Oversized chunks are split into
//! fixed windows and undersized ones are folded into a neighbour.
//!
//! All lengths are character counts.

use crate::config::ChunkingConfig;
use crate::merge::MergedPage;
use crate::record::Chunk;
use crate::segment::{PunctuationSegmenter, SentenceSegmenter};
use std::sync::Arc;

/// Per-page rechunker
#[derive(Clone)]
pub struct Rechunker {
    config: ChunkingConfig,
    segmenter: Arc<dyn SentenceSegmenter>,
}

impl std::fmt::Debug for Rechunker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rechunker")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for Rechunker {
    fn default() -> Self {
        Self::new(ChunkingConfig::default())
    }
}

impl Rechunker {
    /// Create a rechunker using punctuation segmentation
    pub fn new(config: ChunkingConfig) -> Self {
        Self::with_segmenter(config, Arc::new(PunctuationSegmenter::default()))
    }

    /// Create a rechunker with a custom segmenter
    pub fn with_segmenter(config: ChunkingConfig, segmenter: Arc<dyn SentenceSegmenter>) -> Self {
        Self { config, segmenter }
    }

    /// Chunking parameters in use
    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Rechunk one page and tag every piece with the page's address
    pub fn rechunk_page(&self, page: &MergedPage) -> Vec<Chunk> {
        self.rechunk(&page.text)
            .into_iter()
            .map(|content| Chunk::new(content, &page.key))
            .collect()
    }

    /// Rechunk a text into trimmed, non-empty pieces
    pub fn rechunk(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let segments = self.segmenter.segment(text);
        let packed = self.pack(&segments);
        let bounded: Vec<String> = packed
            .into_iter()
            .flat_map(|chunk| self.force_split(chunk))
            .collect();
        self.absorb_undersized(bounded)
    }

    /// Greedy packing with a tail carried into the next buffer
    fn pack(&self, segments: &[String]) -> Vec<String> {
        let target = self.config.target_len;
        let mut out = Vec::new();
        let mut buf = String::new();
        let mut buf_len = 0;

        for segment in segments {
            let segment_len = char_len(segment);
            if buf_len + segment_len + 1 <= target {
                if !buf.is_empty() {
                    buf.push(' ');
                    buf_len += 1;
                }
                buf.push_str(segment);
                buf_len += segment_len;
                continue;
            }

            let tail = tail_chars(&buf, self.config.overlap).trim().to_string();
            if !buf.is_empty() {
                out.push(buf.trim().to_string());
            }

            buf = if tail.is_empty() {
                segment.clone()
            } else {
                format!("{tail} {segment}")
            };
            buf_len = char_len(&buf);
        }

        let last = buf.trim();
        if !last.is_empty() {
            out.push(last.to_string());
        }

        out
    }

    /// Replace a chunk longer than `max_len` with overlapping windows
    fn force_split(&self, chunk: String) -> Vec<String> {
        let chars: Vec<char> = chunk.chars().collect();
        if chars.len() <= self.config.max_len {
            return vec![chunk];
        }

        let step = self.config.target_len;
        let window = self.config.window_len();
        let mut pieces = Vec::new();
        let mut covered_to = 0;

        for start in (0..chars.len()).step_by(step) {
            let end = (start + window).min(chars.len());
            let piece: String = chars[start..end].iter().collect();
            let piece = piece.trim();

            // A short trailing window already inside the previous one adds nothing
            let contained = end <= covered_to;
            if piece.is_empty() || (contained && char_len(piece) < self.config.min_len) {
                continue;
            }

            pieces.push(piece.to_string());
            covered_to = end;
        }

        pieces
    }

    /// Fold chunks shorter than `min_len` into a neighbour
    fn absorb_undersized(&self, chunks: Vec<String>) -> Vec<String> {
        let bound = self.config.upper_bound();
        let min_len = self.config.min_len;
        let mut out: Vec<String> = Vec::with_capacity(chunks.len());
        let mut held = String::new();

        for chunk in chunks {
            if held.is_empty() {
                if char_len(&chunk) < min_len {
                    held = chunk;
                } else {
                    out.push(chunk);
                }
                continue;
            }

            let combined = format!("{held} {chunk}");
            let combined_len = char_len(&combined);
            if combined_len > bound {
                let pending = std::mem::take(&mut held);
                release(&mut out, pending, bound);
                if char_len(&chunk) < min_len {
                    held = chunk;
                } else {
                    out.push(chunk);
                }
            } else if combined_len < min_len {
                held = combined;
            } else {
                out.push(combined);
                held.clear();
            }
        }

        if !held.is_empty() {
            release(&mut out, held, bound);
        }

        out
    }
}

/// Append held text to the last chunk when it fits, otherwise emit it alone
fn release(out: &mut Vec<String>, held: String, bound: usize) {
    if let Some(last) = out.last_mut() {
        if char_len(last) + 1 + char_len(&held) <= bound {
            last.push(' ');
            last.push_str(&held);
            return;
        }
    }
    out.push(held);
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// The last `n` characters of a text, or all of it when shorter
fn tail_chars(text: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    match text.char_indices().rev().nth(n - 1) {
        Some((index, _)) => &text[index..],
        None => text,
    }
}
