//! Per-file page offset estimation between a baseline and a candidate source
//!
//! Each file is aligned independently by trying every offset in a small
//! bounded range and keeping the one whose shifted candidate pages overlap
//! the baseline pages the most. Skews outside the range are not detected;
//! a poor match still yields the best offset of the range.

use crate::config::OffsetConfig;
use crate::index::PageIndex;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};

/// How to choose between offsets with the same overlap
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// Keep the earliest offset in search order. Only a strictly larger
    /// overlap replaces the current best, which starts at offset 0 with no
    /// overlap, so files that never overlap get 0.
    #[default]
    FirstSeen,
    /// Prefer the offset with the smallest magnitude, then search order.
    NearestZero,
}

impl TieBreak {
    /// Stable name used in configuration files and flags
    pub fn as_str(&self) -> &'static str {
        match self {
            TieBreak::FirstSeen => "first-seen",
            TieBreak::NearestZero => "nearest-zero",
        }
    }
}

/// Selected page offset per file
///
/// Files without an entry use offset 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OffsetTable {
    offsets: BTreeMap<String, i64>,
}

impl OffsetTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the offset of a file, replacing any previous one
    pub fn insert(&mut self, file_name: impl Into<String>, offset: i64) {
        self.offsets.insert(file_name.into(), offset);
    }

    /// Offset of a file (0 when absent)
    pub fn get(&self, file_name: &str) -> i64 {
        self.offsets.get(file_name).copied().unwrap_or(0)
    }

    /// Whether an offset was recorded for the file
    pub fn contains(&self, file_name: &str) -> bool {
        self.offsets.contains_key(file_name)
    }

    /// Recorded entries in file order
    pub fn iter(&self) -> btree_map::Iter<'_, String, i64> {
        self.offsets.iter()
    }

    /// Number of recorded files
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Files whose offset is not zero
    pub fn shifted_files(&self) -> impl Iterator<Item = (&str, i64)> {
        self.offsets
            .iter()
            .filter(|(_, offset)| **offset != 0)
            .map(|(file, offset)| (file.as_str(), *offset))
    }
}

/// Outcome of aligning one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetDecision {
    /// Chosen offset
    pub offset: i64,
    /// Number of baseline pages matched at that offset
    pub overlap: usize,
}

/// Bounded-range offset search
#[derive(Debug, Clone)]
pub struct OffsetEstimator {
    candidates: Vec<i64>,
    tie_break: TieBreak,
}

impl Default for OffsetEstimator {
    fn default() -> Self {
        Self::from_config(&OffsetConfig::default())
    }
}

impl OffsetEstimator {
    /// Create an estimator over the given offsets, tried in order
    pub fn new(candidates: Vec<i64>, tie_break: TieBreak) -> Self {
        Self {
            candidates,
            tie_break,
        }
    }

    /// Create an estimator from configuration
    pub fn from_config(config: &OffsetConfig) -> Self {
        Self::new(config.candidates.clone(), config.tie_break)
    }

    /// Estimate one offset per file present in both sources.
    ///
    /// Files of the baseline that the candidate lacks get no entry, as do
    /// files only the candidate has.
    pub fn estimate(&self, baseline: &PageIndex, candidate: &PageIndex) -> OffsetTable {
        let mut table = OffsetTable::new();

        for file_name in baseline.files() {
            let candidate_pages = candidate.pages_for(file_name);
            if candidate_pages.is_empty() {
                continue;
            }
            let baseline_pages = baseline.pages_for(file_name);

            let scored = self.candidates.iter().map(|&offset| {
                let overlap = candidate_pages
                    .iter()
                    .filter_map(|page| page.checked_add(offset))
                    .filter(|page| baseline_pages.contains(page))
                    .count();
                OffsetDecision { offset, overlap }
            });
            let decision = self.select(scored);

            table.insert(file_name, decision.offset);
        }

        table
    }

    /// Pick the winning offset from scores given in search order
    pub fn select(&self, scored: impl IntoIterator<Item = OffsetDecision>) -> OffsetDecision {
        let mut best = OffsetDecision {
            offset: 0,
            overlap: 0,
        };

        for decision in scored {
            let better = match self.tie_break {
                TieBreak::FirstSeen => decision.overlap > best.overlap,
                TieBreak::NearestZero => {
                    decision.overlap > best.overlap
                        || (decision.overlap == best.overlap
                            && decision.overlap > 0
                            && decision.offset.abs() < best.offset.abs())
                }
            };
            if better {
                best = decision;
            }
        }

        best
    }
}
