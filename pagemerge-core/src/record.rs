//! Record types exchanged with the extraction and indexing collaborators

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// One page-level text block as emitted by an upstream extractor
///
/// Both sources share this schema. `page` is kept as raw JSON because some
/// extractors emit it as a string key; it is validated by [`parse_page`]
/// when the record is indexed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPageRecord {
    /// Optional extractor-assigned identifier, carried but unused
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Extracted page text
    #[serde(default, deserialize_with = "string_or_empty")]
    pub content: String,
    /// Provenance of the text block
    #[serde(default)]
    pub metadata: RawMetadata,
}

/// Provenance attached to a raw record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMetadata {
    /// Source document name as reported by the extractor
    #[serde(default, deserialize_with = "string_or_empty")]
    pub file_name: String,
    /// Page number, integer-like but unvalidated
    #[serde(default)]
    pub page: Value,
}

impl RawPageRecord {
    /// Convenience constructor for an integer page
    pub fn new(file_name: impl Into<String>, page: i64, content: impl Into<String>) -> Self {
        Self {
            id: None,
            content: content.into(),
            metadata: RawMetadata {
                file_name: file_name.into(),
                page: Value::from(page),
            },
        }
    }
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Cast a raw page value to a page number.
///
/// Integers pass through, finite floats truncate toward zero, strings are
/// trimmed and parsed as signed integers. Everything else is unparsable.
pub fn parse_page(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Address of a document page: normalized file name plus page number
///
/// Ordering is by file name, then page number ascending; every stage that
/// walks pages uses this order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageKey {
    /// Normalized file name
    pub file_name: String,
    /// Page number after validation (and offset, for the candidate)
    pub page: i64,
}

impl PageKey {
    /// Create a new page key
    pub fn new(file_name: impl Into<String>, page: i64) -> Self {
        Self {
            file_name: file_name.into(),
            page,
        }
    }

    /// The same file, shifted by `offset` pages
    ///
    /// `None` when the shifted page number does not fit an `i64`.
    pub fn shifted(&self, offset: i64) -> Option<Self> {
        Some(Self {
            file_name: self.file_name.clone(),
            page: self.page.checked_add(offset)?,
        })
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.file_name, self.page)
    }
}

/// Final output unit handed to the indexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Chunk text
    pub content: String,
    /// Page the text came from
    pub metadata: ChunkMetadata,
}

/// Provenance of an output chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Normalized file name
    pub file_name: String,
    /// Page number in the baseline numbering
    pub page: i64,
}

impl Chunk {
    /// Create a chunk for the given page
    pub fn new(content: impl Into<String>, key: &PageKey) -> Self {
        Self {
            content: content.into(),
            metadata: ChunkMetadata {
                file_name: key.file_name.clone(),
                page: key.page,
            },
        }
    }

    /// Content length in characters
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}
