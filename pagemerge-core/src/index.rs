//! Page indexing: group raw records by (file, page)

use crate::normalize::{normalize_filename, normalize_text};
use crate::offset::OffsetTable;
use crate::record::{parse_page, PageKey, RawPageRecord};
use std::collections::btree_map::{self, BTreeMap};
use std::collections::BTreeSet;

/// Counters collected while indexing one source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Records that contributed text
    pub accepted: usize,
    /// Records dropped because the page number could not be cast
    pub skipped_page: usize,
    /// Records dropped because their text normalized to nothing
    pub skipped_empty: usize,
}

impl IndexStats {
    /// Total records seen
    pub fn total(&self) -> usize {
        self.accepted + self.skipped_page + self.skipped_empty
    }
}

/// Normalized page texts keyed by [`PageKey`]
///
/// Each key holds the contributing texts in arrival order. Iteration is in
/// key order (file name, then page).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageIndex {
    pages: BTreeMap<PageKey, Vec<String>>,
}

impl PageIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Index one source's records.
    ///
    /// Records with an unparsable page or empty text are skipped and
    /// counted, never reported as errors.
    pub fn from_records(records: &[RawPageRecord]) -> (Self, IndexStats) {
        let mut index = Self::new();
        let mut stats = IndexStats::default();

        for record in records {
            let Some(page) = parse_page(&record.metadata.page) else {
                stats.skipped_page += 1;
                continue;
            };

            let content = normalize_text(&record.content);
            if content.is_empty() {
                stats.skipped_empty += 1;
                continue;
            }

            let file_name = normalize_filename(&record.metadata.file_name);
            index.push(PageKey::new(file_name, page), content);
            stats.accepted += 1;
        }

        (index, stats)
    }

    /// Append one text to a page
    pub fn push(&mut self, key: PageKey, content: String) {
        self.pages.entry(key).or_default().push(content);
    }

    /// Texts recorded for a page
    pub fn get(&self, key: &PageKey) -> Option<&[String]> {
        self.pages.get(key).map(Vec::as_slice)
    }

    /// Whether the page is present
    pub fn contains(&self, key: &PageKey) -> bool {
        self.pages.contains_key(key)
    }

    /// All page keys in order
    pub fn keys(&self) -> impl Iterator<Item = &PageKey> {
        self.pages.keys()
    }

    /// All pages in order
    pub fn iter(&self) -> btree_map::Iter<'_, PageKey, Vec<String>> {
        self.pages.iter()
    }

    /// Distinct file names in order
    pub fn files(&self) -> BTreeSet<&str> {
        self.pages.keys().map(|key| key.file_name.as_str()).collect()
    }

    /// Page numbers present for a file
    pub fn pages_for(&self, file_name: &str) -> BTreeSet<i64> {
        self.file_range(file_name).map(|(key, _)| key.page).collect()
    }

    /// Number of distinct pages for a file
    pub fn page_count(&self, file_name: &str) -> usize {
        self.file_range(file_name).count()
    }

    // Keys sort by file name first, so one file's pages are contiguous
    fn file_range(&self, file_name: &str) -> btree_map::Range<'_, PageKey, Vec<String>> {
        let first = PageKey::new(file_name, i64::MIN);
        let last = PageKey::new(file_name, i64::MAX);
        self.pages.range(first..=last)
    }

    /// Number of distinct pages
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether no page was indexed
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Shift every page by its file's offset.
    ///
    /// Keys that collide after shifting concatenate their texts; the key
    /// visited first (in the original key order) contributes first. Pages
    /// whose shifted number would overflow are dropped.
    pub fn apply_offsets(&self, offsets: &OffsetTable) -> PageIndex {
        let mut shifted = PageIndex::new();
        for (key, contents) in &self.pages {
            let Some(target) = key.shifted(offsets.get(&key.file_name)) else {
                continue;
            };
            shifted
                .pages
                .entry(target)
                .or_default()
                .extend(contents.iter().cloned());
        }
        shifted
    }
}

impl<'a> IntoIterator for &'a PageIndex {
    type Item = (&'a PageKey, &'a Vec<String>);
    type IntoIter = btree_map::Iter<'a, PageKey, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RawMetadata;
    use serde_json::json;

    fn record(file: &str, page: serde_json::Value, content: &str) -> RawPageRecord {
        RawPageRecord {
            id: None,
            content: content.to_string(),
            metadata: RawMetadata {
                file_name: file.to_string(),
                page,
            },
        }
    }

    #[test]
    fn test_from_records_groups_and_skips() {
        let records = vec![
            record("a.pdf", json!(0), "first"),
            record("a.pdf", json!("0"), "second"),
            record("a.pdf", json!("x"), "dropped page"),
            record("a.pdf", json!(1), " \u{200B}\n "),
            record("a  .pdf", json!(2), "spaced"),
        ];

        let (index, stats) = PageIndex::from_records(&records);

        assert_eq!(stats.accepted, 3);
        assert_eq!(stats.skipped_page, 1);
        assert_eq!(stats.skipped_empty, 1);
        assert_eq!(stats.total(), 5);

        assert_eq!(
            index.get(&PageKey::new("a.pdf", 0)),
            Some(&["first".to_string(), "second".to_string()][..])
        );
        assert!(!index.contains(&PageKey::new("a.pdf", 1)));
        assert!(index.contains(&PageKey::new("a .pdf", 2)));
    }

    #[test]
    fn test_files_and_pages() {
        let records = vec![
            RawPageRecord::new("b.pdf", 3, "x"),
            RawPageRecord::new("a.pdf", 5, "y"),
            RawPageRecord::new("a.pdf", 1, "z"),
        ];
        let (index, _) = PageIndex::from_records(&records);

        assert_eq!(index.files().into_iter().collect::<Vec<_>>(), vec!["a.pdf", "b.pdf"]);
        assert_eq!(index.pages_for("a.pdf").into_iter().collect::<Vec<_>>(), vec![1, 5]);
        assert_eq!(index.page_count("b.pdf"), 1);
        assert_eq!(index.page_count("a"), 0);
        assert!(index.pages_for("c.pdf").is_empty());
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_huge_page_numbers_are_indexed_and_shifted_safely() {
        let records = vec![
            record("f.pdf", json!("9223372036854775807"), "last page"),
            record("f.pdf", json!(1), "first page"),
        ];
        let (index, stats) = PageIndex::from_records(&records);
        assert_eq!(stats.accepted, 2);
        assert_eq!(index.pages_for("f.pdf").into_iter().collect::<Vec<_>>(), vec![1, i64::MAX]);

        let mut offsets = OffsetTable::new();
        offsets.insert("f.pdf", 1);
        let shifted = index.apply_offsets(&offsets);
        assert_eq!(shifted.len(), 1);
        assert!(shifted.contains(&PageKey::new("f.pdf", 2)));
    }

    #[test]
    fn test_apply_offsets_per_file() {
        let mut index = PageIndex::new();
        index.push(PageKey::new("a.pdf", 1), "one".into());
        index.push(PageKey::new("a.pdf", 2), "two".into());
        index.push(PageKey::new("b.pdf", 2), "other file".into());

        let mut offsets = OffsetTable::new();
        offsets.insert("a.pdf", -1);

        let shifted = index.apply_offsets(&offsets);
        assert_eq!(shifted.get(&PageKey::new("a.pdf", 0)), Some(&["one".to_string()][..]));
        assert_eq!(shifted.get(&PageKey::new("a.pdf", 1)), Some(&["two".to_string()][..]));
        assert!(shifted.contains(&PageKey::new("b.pdf", 2)));

        // Files without an entry keep their numbering
        assert_eq!(index.apply_offsets(&OffsetTable::new()), index);
    }
}
