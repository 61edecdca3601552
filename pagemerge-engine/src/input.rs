//! Input abstraction for page record sources
//!
//! Either source can come from memory, a file, raw bytes or a stream. All
//! variants end up as a fully parsed `Vec<RawPageRecord>`; nothing is
//! processed until both sources are loaded.

use crate::error::{EngineError, Result};
use pagemerge_core::RawPageRecord;
use std::fs;
use std::io::Read;
use std::path::PathBuf;

/// One extraction source
pub enum Input {
    /// Records already in memory
    Records(Vec<RawPageRecord>),
    /// JSON array text
    Json(String),
    /// Path to a JSON array file
    File(PathBuf),
    /// UTF-8 JSON bytes
    Bytes(Vec<u8>),
    /// Reader stream (stdin, network, ...)
    Reader(Box<dyn Read + Send>),
}

impl std::fmt::Debug for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Input::Records(records) => f
                .debug_tuple("Records")
                .field(&format!("<{} records>", records.len()))
                .finish(),
            Input::Json(text) => f
                .debug_tuple("Json")
                .field(&format!("<{} bytes>", text.len()))
                .finish(),
            Input::File(path) => f.debug_tuple("File").field(path).finish(),
            Input::Bytes(bytes) => f
                .debug_tuple("Bytes")
                .field(&format!("<{} bytes>", bytes.len()))
                .finish(),
            Input::Reader(_) => f.debug_tuple("Reader").field(&"<Reader>").finish(),
        }
    }
}

impl Input {
    /// Create input from in-memory records
    pub fn from_records(records: Vec<RawPageRecord>) -> Self {
        Input::Records(records)
    }

    /// Create input from JSON text
    pub fn from_json<S: Into<String>>(json: S) -> Self {
        Input::Json(json.into())
    }

    /// Create input from a file path
    pub fn from_file<P: Into<PathBuf>>(path: P) -> Self {
        Input::File(path.into())
    }

    /// Create input from bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Input::Bytes(bytes)
    }

    /// Create input from a reader
    pub fn from_reader<R: Read + Send + 'static>(reader: R) -> Self {
        Input::Reader(Box::new(reader))
    }

    /// Short description used in error messages and logs
    pub fn describe(&self) -> String {
        match self {
            Input::Records(_) => "<records>".to_string(),
            Input::Json(_) => "<json>".to_string(),
            Input::File(path) => path.display().to_string(),
            Input::Bytes(_) => "<bytes>".to_string(),
            Input::Reader(_) => "<reader>".to_string(),
        }
    }

    /// Fail early when a file input does not exist
    pub fn check_exists(&self) -> Result<()> {
        match self {
            Input::File(path) if !path.exists() => Err(EngineError::InputNotFound {
                path: path.clone(),
            }),
            _ => Ok(()),
        }
    }

    /// Load and parse the records
    pub fn into_records(self) -> Result<Vec<RawPageRecord>> {
        let name = self.describe();
        match self {
            Input::Records(records) => Ok(records),
            Input::Json(text) => parse_records(text.as_bytes(), &name),
            Input::File(path) => {
                if !path.exists() {
                    return Err(EngineError::InputNotFound { path });
                }
                let bytes = fs::read(&path).map_err(|e| {
                    EngineError::IoError(format!("Failed to read file {}: {e}", path.display()))
                })?;
                parse_records(&bytes, &name)
            }
            Input::Bytes(bytes) => parse_records(&bytes, &name),
            Input::Reader(mut reader) => {
                let mut buffer = Vec::new();
                reader.read_to_end(&mut buffer).map_err(|e| {
                    EngineError::IoError(format!("Failed to read from stream: {e}"))
                })?;
                parse_records(&buffer, &name)
            }
        }
    }
}

fn parse_records(bytes: &[u8], name: &str) -> Result<Vec<RawPageRecord>> {
    serde_json::from_slice(bytes).map_err(|e| EngineError::Parse {
        source_name: name.to_string(),
        reason: e.to_string(),
    })
}

impl From<Vec<RawPageRecord>> for Input {
    fn from(records: Vec<RawPageRecord>) -> Self {
        Input::Records(records)
    }
}

impl From<PathBuf> for Input {
    fn from(path: PathBuf) -> Self {
        Input::File(path)
    }
}

impl From<Vec<u8>> for Input {
    fn from(bytes: Vec<u8>) -> Self {
        Input::Bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = r#"[
        {"content": "Alpha.", "metadata": {"page": 0, "file_name": "a.pdf"}},
        {"id": "x", "content": "Beta.", "metadata": {"page": "1", "file_name": "a.pdf"}}
    ]"#;

    #[test]
    fn test_json_and_bytes_and_reader() {
        let from_json = Input::from_json(SAMPLE).into_records().unwrap();
        let from_bytes = Input::from_bytes(SAMPLE.as_bytes().to_vec())
            .into_records()
            .unwrap();
        let from_reader = Input::from_reader(Cursor::new(SAMPLE.as_bytes().to_vec()))
            .into_records()
            .unwrap();

        assert_eq!(from_json.len(), 2);
        assert_eq!(from_json, from_bytes);
        assert_eq!(from_json, from_reader);
        assert_eq!(from_json[1].id.as_deref(), Some("x"));
    }

    #[test]
    fn test_missing_file() {
        let input = Input::from_file("/definitely/not/here.json");
        assert!(matches!(input.check_exists(), Err(EngineError::InputNotFound { .. })));
        assert!(matches!(
            input.into_records(),
            Err(EngineError::InputNotFound { .. })
        ));
    }

    #[test]
    fn test_file_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pages.json");
        fs::write(&path, SAMPLE).unwrap();

        let records = Input::from_file(&path).into_records().unwrap();
        assert_eq!(records[0].content, "Alpha.");
    }

    #[test]
    fn test_not_an_array_is_parse_error() {
        let err = Input::from_json(r#"{"content": "x"}"#)
            .into_records()
            .unwrap_err();
        match err {
            EngineError::Parse { source_name, .. } => assert_eq!(source_name, "<json>"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_debug_hides_payload() {
        let input = Input::from_bytes(vec![0; 16]);
        assert_eq!(format!("{input:?}"), "Bytes(\"<16 bytes>\")");
    }
}
