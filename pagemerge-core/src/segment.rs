//! Sentence-like segmentation of page text
//!
//! Segmentation is a seam: the rechunker only sees [`SentenceSegmenter`],
//! so a language-aware implementation can replace the punctuation scanner.

use crate::config::SegmentationConfig;

/// Splits text into ordered, trimmed, non-empty segments
pub trait SentenceSegmenter: Send + Sync {
    /// Segment a text; concatenating the segments loses only whitespace
    fn segment(&self, text: &str) -> Vec<String>;
}

/// Cuts after terminal punctuation and at line breaks
#[derive(Debug, Clone)]
pub struct PunctuationSegmenter {
    terminators: Vec<char>,
}

impl Default for PunctuationSegmenter {
    fn default() -> Self {
        Self::from_config(&SegmentationConfig::default())
    }
}

impl PunctuationSegmenter {
    /// Create a segmenter for the given terminators
    pub fn new(terminators: Vec<char>) -> Self {
        Self { terminators }
    }

    /// Create a segmenter from configuration
    pub fn from_config(config: &SegmentationConfig) -> Self {
        Self::new(config.terminators.clone())
    }

    fn is_terminator(&self, ch: char) -> bool {
        self.terminators.contains(&ch)
    }
}

impl SentenceSegmenter for PunctuationSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut chars = text.chars().peekable();

        while let Some(ch) = chars.next() {
            if ch == '\n' {
                flush(&mut segments, &mut current);
                while chars.next_if_eq(&'\n').is_some() {}
                continue;
            }

            current.push(ch);
            if self.is_terminator(ch) {
                flush(&mut segments, &mut current);
                while chars.next_if(|next| next.is_whitespace()).is_some() {}
            }
        }
        flush(&mut segments, &mut current);

        segments
    }
}

fn flush(segments: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        segments.push(trimmed.to_string());
    }
    current.clear();
}
