//! Canonical forms for file names and page text, plus the content digest
//! used for exact-duplicate detection.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

static WHITESPACE_RUN: OnceLock<Regex> = OnceLock::new();
static INLINE_BLANK_RUN: OnceLock<Regex> = OnceLock::new();
static NEWLINE_RUN: OnceLock<Regex> = OnceLock::new();

fn whitespace_run() -> &'static Regex {
    WHITESPACE_RUN.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace pattern"))
}

fn inline_blank_run() -> &'static Regex {
    INLINE_BLANK_RUN.get_or_init(|| Regex::new(r"[ \t]+").expect("valid blank pattern"))
}

fn newline_run() -> &'static Regex {
    NEWLINE_RUN.get_or_init(|| Regex::new(r"\n{3,}").expect("valid newline pattern"))
}

/// Full-width punctuation that extractors disagree on in file names
const FULL_WIDTH_MAP: [(char, char); 6] = [
    ('（', '('),
    ('）', ')'),
    ('，', ','),
    ('：', ':'),
    ('“', '"'),
    ('”', '"'),
];

/// Invisible characters stripped from page text
const INVISIBLE_CHARS: [char; 3] = ['\u{200B}', '\u{FEFF}', '\r'];

/// Canonicalize a file name so both sources address the same document.
///
/// Full-width brackets, comma, colon and curly double quotes become their
/// ASCII forms; whitespace runs collapse to a single space.
pub fn normalize_filename(raw: &str) -> String {
    let mapped: String = raw
        .chars()
        .map(|ch| {
            FULL_WIDTH_MAP
                .iter()
                .find(|(from, _)| *from == ch)
                .map(|(_, to)| *to)
                .unwrap_or(ch)
        })
        .collect();

    whitespace_run().replace_all(&mapped, " ").trim().to_string()
}

/// Canonicalize page text.
///
/// Drops zero-width spaces, byte-order marks and carriage returns, squeezes
/// space/tab runs, limits blank lines to one and trims the result.
pub fn normalize_text(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let visible: String = raw
        .chars()
        .filter(|ch| !INVISIBLE_CHARS.contains(ch))
        .collect();
    let squeezed = inline_blank_run().replace_all(&visible, " ");
    collapse_blank_runs(&squeezed)
}

/// Collapse three or more consecutive newlines into exactly two and trim.
pub fn collapse_blank_runs(text: &str) -> String {
    newline_run().replace_all(text, "\n\n").trim().to_string()
}

/// Characters that end a line, besides the `\r\n` pair
const LINE_BREAKS: [char; 10] = [
    '\n', '\r', '\u{0B}', '\u{0C}', '\u{1C}', '\u{1D}', '\u{1E}', '\u{85}', '\u{2028}',
    '\u{2029}',
];

/// Split a text into lines at every Unicode line boundary.
///
/// Besides `\n` and `\r\n` this breaks on vertical tab, form feed, the
/// file/group/record separators, NEL and the Unicode line and paragraph
/// separators. A trailing break does not start an extra empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((index, ch)) = chars.next() {
        if !LINE_BREAKS.contains(&ch) {
            continue;
        }
        lines.push(&text[start..index]);
        start = index + ch.len_utf8();
        if ch == '\r' && chars.next_if(|(_, next)| *next == '\n').is_some() {
            start += 1;
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }

    lines
}

/// 128-bit digest of a normalized, lower-cased text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Raw digest bytes
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Digest used to recognise exact duplicates.
///
/// Two texts hash equally when they agree after [`normalize_text`] and
/// lower-casing. This is an identity check, not a similarity measure.
pub fn hash_text(text: &str) -> ContentHash {
    let folded = normalize_text(text).to_lowercase();
    ContentHash(md5::compute(folded.as_bytes()).0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_filename_full_width() {
        assert_eq!(
            normalize_filename("  报告（2023），摘要：“终稿”.pdf "),
            "报告(2023),摘要:\"终稿\".pdf"
        );
    }

    #[test]
    fn test_normalize_filename_whitespace() {
        assert_eq!(normalize_filename("annual \t report\n v2.pdf"), "annual report v2.pdf");
        assert_eq!(normalize_filename("a\u{3000}\u{3000}b.pdf"), "a b.pdf");
        assert_eq!(normalize_filename(""), "");
    }

    #[test]
    fn test_normalize_text_invisible_and_line_endings() {
        assert_eq!(normalize_text("\u{FEFF}Hello\u{200B} world\r\n"), "Hello world");
    }

    #[test]
    fn test_normalize_text_collapses_runs() {
        assert_eq!(normalize_text("a  \t b"), "a b");
        assert_eq!(normalize_text("a\n\n\n\n\nb"), "a\n\nb");
        assert_eq!(normalize_text("a\n\nb"), "a\n\nb");
        assert_eq!(normalize_text("  \n\n "), "");
    }

    #[test]
    fn test_split_lines_unicode_boundaries() {
        assert_eq!(split_lines("a\nb\r\nc\rd"), vec!["a", "b", "c", "d"]);
        assert_eq!(
            split_lines("page\u{0C}Footer\u{2028}x\u{85}y\u{0B}z"),
            vec!["page", "Footer", "x", "y", "z"]
        );
        assert_eq!(split_lines("a\n\nb\n"), vec!["a", "", "b"]);
        assert_eq!(split_lines("\n"), vec![""]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_normalize_text_is_idempotent() {
        let raw = " Title\r\n\r\n\r\n\tBody  text \u{200B}\n\n\n\nEnd ";
        let once = normalize_text(raw);
        assert_eq!(normalize_text(&once), once);
    }

    #[test]
    fn test_hash_text_case_and_whitespace_insensitive() {
        assert_eq!(hash_text("Hello   World"), hash_text("hello world"));
        assert_eq!(hash_text("  Hello world\r\n"), hash_text("hello world"));
        assert_ne!(hash_text("hello world"), hash_text("hello world!"));
    }

    #[test]
    fn test_hash_display_is_md5_hex() {
        // md5("") = d41d8cd98f00b204e9800998ecf8427e
        assert_eq!(hash_text("").to_string(), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(hash_text("abc").to_string().len(), 32);
    }
}
