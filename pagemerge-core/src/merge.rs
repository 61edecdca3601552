//! Page merging across the two sources

use crate::boilerplate::BoilerplateSet;
use crate::index::PageIndex;
use crate::normalize::normalize_text;
use crate::record::PageKey;
use std::collections::BTreeSet;

/// One page's reconciled text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedPage {
    /// Page address in the baseline numbering
    pub key: PageKey,
    /// Boilerplate-free, normalized text; never empty
    pub text: String,
}

impl MergedPage {
    /// Create a merged page
    pub fn new(key: PageKey, text: impl Into<String>) -> Self {
        Self {
            key,
            text: text.into(),
        }
    }
}

/// Pages produced by a merge, plus the pages that came out empty
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeResult {
    /// Non-empty pages in key order
    pub pages: Vec<MergedPage>,
    /// Keys whose text was entirely boilerplate
    pub dropped: usize,
}

/// Combines the texts both sources hold for each page
#[derive(Debug, Clone, Copy)]
pub struct PageMerger<'a> {
    boilerplate: &'a BoilerplateSet,
}

impl<'a> PageMerger<'a> {
    /// Create a merger stripping the given boilerplate
    pub fn new(boilerplate: &'a BoilerplateSet) -> Self {
        Self { boilerplate }
    }

    /// Merge the baseline with the offset-applied candidate.
    ///
    /// Walks the sorted union of keys. For each page the baseline texts come
    /// first, then the candidate texts; each is stripped of its file's
    /// boilerplate and the survivors are joined by a blank line.
    pub fn merge(&self, baseline: &PageIndex, candidate: &PageIndex) -> MergeResult {
        let keys: BTreeSet<&PageKey> = baseline.keys().chain(candidate.keys()).collect();
        let mut result = MergeResult::default();

        for key in keys {
            let contents = baseline
                .get(key)
                .unwrap_or_default()
                .iter()
                .chain(candidate.get(key).unwrap_or_default());

            match self.merge_page(key, contents) {
                Some(page) => result.pages.push(page),
                None => result.dropped += 1,
            }
        }

        result
    }

    fn merge_page<'t>(
        &self,
        key: &PageKey,
        contents: impl Iterator<Item = &'t String>,
    ) -> Option<MergedPage> {
        let parts: Vec<String> = contents
            .map(|content| self.boilerplate.strip(&key.file_name, content))
            .filter(|part| !part.is_empty())
            .collect();

        let text = normalize_text(&parts.join("\n\n"));
        (!text.is_empty()).then(|| MergedPage::new(key.clone(), text))
    }
}
