//! Recurring header/footer line detection
//!
//! A line that shows up on a large share of one file's pages (running
//! titles, page furniture, legal footers) carries no content. Detection is
//! per file and runs over every source at once, so a header recognised
//! because of one source's pagination is stripped from the other as well.

use crate::config::BoilerplateConfig;
use crate::index::PageIndex;
use crate::normalize::{collapse_blank_runs, split_lines};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Boilerplate lines per file, never shared across files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoilerplateSet {
    lines: HashMap<String, HashSet<String>>,
}

impl BoilerplateSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a trimmed line as boilerplate for a file
    pub fn insert(&mut self, file_name: impl Into<String>, line: impl Into<String>) {
        self.lines
            .entry(file_name.into())
            .or_default()
            .insert(line.into());
    }

    /// Whether the trimmed line is boilerplate for the file
    pub fn contains(&self, file_name: &str, line: &str) -> bool {
        self.lines
            .get(file_name)
            .is_some_and(|lines| lines.contains(line))
    }

    /// Boilerplate lines of a file
    pub fn lines_for(&self, file_name: &str) -> Option<&HashSet<String>> {
        self.lines.get(file_name)
    }

    /// Number of boilerplate lines per file, in file order
    pub fn counts(&self) -> BTreeMap<String, usize> {
        self.lines
            .iter()
            .map(|(file, lines)| (file.clone(), lines.len()))
            .collect()
    }

    /// Total number of boilerplate lines over all files
    pub fn total_lines(&self) -> usize {
        self.lines.values().map(HashSet::len).sum()
    }

    /// Remove a file's boilerplate lines from a text.
    ///
    /// Lines are compared after trimming; kept lines are left untouched.
    pub fn strip(&self, file_name: &str, text: &str) -> String {
        let Some(lines) = self.lines.get(file_name).filter(|lines| !lines.is_empty()) else {
            return text.to_string();
        };

        let kept: Vec<&str> = split_lines(text)
            .into_iter()
            .filter(|line| !lines.contains(line.trim()))
            .collect();

        collapse_blank_runs(&kept.join("\n"))
    }
}

/// Frequency-based boilerplate detector
#[derive(Debug, Clone, Default)]
pub struct BoilerplateDetector {
    config: BoilerplateConfig,
}

impl BoilerplateDetector {
    /// Create a detector with the given thresholds
    pub fn new(config: BoilerplateConfig) -> Self {
        Self { config }
    }

    /// Detect boilerplate over the union of the given indexes.
    ///
    /// For each file, a distinct trimmed line is boilerplate when the share
    /// of the file's distinct pages it appears on reaches the frequency
    /// threshold, it recurs on at least `min_pages` pages and its length
    /// lies within the configured bounds. A line seen on a single page is
    /// content however small the file.
    pub fn detect(&self, sources: &[&PageIndex]) -> BoilerplateSet {
        // file -> page -> texts from every source
        let mut files: BTreeMap<&str, BTreeMap<i64, Vec<&str>>> = BTreeMap::new();
        for source in sources {
            for (key, contents) in source.iter() {
                files
                    .entry(key.file_name.as_str())
                    .or_default()
                    .entry(key.page)
                    .or_default()
                    .extend(contents.iter().map(String::as_str));
            }
        }

        let mut set = BoilerplateSet::new();
        for (file_name, pages) in files {
            let total_pages = pages.len();
            if total_pages == 0 {
                continue;
            }

            let mut line_pages: HashMap<&str, BTreeSet<i64>> = HashMap::new();
            for (page, contents) in &pages {
                for line in contents.iter().flat_map(|content| split_lines(*content)) {
                    let line = line.trim();
                    if line.chars().count() >= self.config.min_line_len {
                        line_pages.entry(line).or_default().insert(*page);
                    }
                }
            }

            for (line, seen_on) in line_pages {
                let share = seen_on.len() as f64 / total_pages as f64;
                if share >= self.config.frequency_threshold
                    && seen_on.len() >= self.config.min_pages
                    && line.chars().count() <= self.config.max_line_len
                {
                    set.insert(file_name, line);
                }
            }
        }

        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::PageKey;

    // Pages numbered from 0 in slice order
    fn pages(file: &str, texts: &[&str]) -> PageIndex {
        let mut index = PageIndex::new();
        for (page, text) in texts.iter().enumerate() {
            index.push(PageKey::new(file, page as i64), text.to_string());
        }
        index
    }

    #[test]
    fn test_detects_frequent_lines() {
        let texts: Vec<String> = (0..10)
            .map(|page| {
                let rare = if page == 0 { "\nRare remark" } else { "" };
                format!("ACME Annual Report\nBody of page {page}{rare}\nPage footer")
            })
            .collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let index = pages("r.pdf", &refs);

        let set = BoilerplateDetector::default().detect(&[&index]);

        assert!(set.contains("r.pdf", "ACME Annual Report"));
        assert!(set.contains("r.pdf", "Page footer"));
        assert!(!set.contains("r.pdf", "Rare remark"));
        assert!(!set.contains("r.pdf", "Body of page 3"));
        assert!(!set.contains("other.pdf", "Page footer"));
        assert_eq!(set.counts().get("r.pdf"), Some(&2));
    }

    #[test]
    fn test_single_page_lines_are_content() {
        let index = pages("a.pdf", &["Alpha.\nFooter X", "Beta.\nFooter X"]);

        let set = BoilerplateDetector::default().detect(&[&index]);
        assert!(set.contains("a.pdf", "Footer X"));
        assert!(!set.contains("a.pdf", "Alpha."));
        assert!(!set.contains("a.pdf", "Beta."));
    }

    #[test]
    fn test_length_bounds() {
        let long_line = "x".repeat(121);
        let texts: Vec<String> = (0..4)
            .map(|page| format!("ab\n{long_line}\npage {page}"))
            .collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let index = pages("f.pdf", &refs);

        let set = BoilerplateDetector::default().detect(&[&index]);
        assert!(!set.contains("f.pdf", "ab"));
        assert!(!set.contains("f.pdf", &long_line));
        assert_eq!(set.total_lines(), 0);
    }

    #[test]
    fn test_threshold_and_length_edges() {
        let at_limit = "m".repeat(120);
        let over_limit = "n".repeat(121);
        let texts: Vec<String> = (0..20)
            .map(|page| {
                let mut lines = vec![
                    format!("Body of page {page}"),
                    at_limit.clone(),
                    over_limit.clone(),
                ];
                if page < 2 {
                    lines.push("Occasional note".to_string());
                }
                if page < 5 {
                    lines.push("Quarter note".to_string());
                }
                if page % 3 == 0 && page < 18 {
                    lines.push("Running head".to_string());
                }
                lines.join("\n")
            })
            .collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let index = pages("f.pdf", &refs);

        let set = BoilerplateDetector::default().detect(&[&index]);

        // 2 of 20 pages is 10%, 5 of 20 is 25%, 6 of 20 is exactly 30%
        assert!(!set.contains("f.pdf", "Occasional note"));
        assert!(!set.contains("f.pdf", "Quarter note"));
        assert!(set.contains("f.pdf", "Running head"));
        assert!(set.contains("f.pdf", &at_limit));
        assert!(!set.contains("f.pdf", &over_limit));
        assert_eq!(set.total_lines(), 2);

        let stripped = set.strip("f.pdf", &texts[0]);
        assert_eq!(
            stripped,
            format!("Body of page 0\n{over_limit}\nOccasional note\nQuarter note")
        );
    }

    #[test]
    fn test_counts_pages_not_occurrences() {
        // Repeated ten times on one page out of four: 25% of pages
        let mut texts = vec!["Repeated line\n".repeat(10)];
        texts.extend(["alpha", "beta", "gamma"].map(String::from));
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let index = pages("f.pdf", &refs);

        let set = BoilerplateDetector::default().detect(&[&index]);
        assert!(!set.contains("f.pdf", "Repeated line"));
    }

    #[test]
    fn test_detection_spans_sources() {
        // 1 of 4 pages in each source, 2 of 4 pages over the union
        let baseline = pages("f.pdf", &["Header\none", "two", "three", "four"]);
        let candidate = pages("f.pdf", &["five", "Header\nsix", "seven", "eight"]);

        let detector = BoilerplateDetector::default();
        assert!(!detector.detect(&[&baseline]).contains("f.pdf", "Header"));
        assert!(detector
            .detect(&[&baseline, &candidate])
            .contains("f.pdf", "Header"));
    }

    #[test]
    fn test_strip_removes_lines_and_blank_runs() {
        let mut set = BoilerplateSet::new();
        set.insert("f.pdf", "Footer X");

        let stripped = set.strip("f.pdf", "Alpha.\n\n  Footer X  \n\nBeta.");
        assert_eq!(stripped, "Alpha.\n\nBeta.");

        assert_eq!(set.strip("f.pdf", "Alpha.\u{0C}Footer X\u{2029}Beta."), "Alpha.\nBeta.");
        assert_eq!(set.strip("g.pdf", "Footer X"), "Footer X");
        assert_eq!(set.strip("f.pdf", "Footer X"), "");
    }
}
