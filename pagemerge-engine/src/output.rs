//! Corpus serialization and atomic file output
//!
//! Files are written to a temp file in the destination directory and
//! renamed into place, so a failed run never leaves a partial corpus.

use crate::error::{EngineError, Result};
use pagemerge_core::Chunk;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Serialize chunks as a pretty-printed JSON array (non-ASCII kept literal)
pub fn write_json<W: Write + ?Sized>(writer: &mut W, chunks: &[Chunk]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, chunks).map_err(json_error)?;
    writeln!(writer)?;
    Ok(())
}

/// Serialize chunks as JSON Lines, one compact chunk per line
pub fn write_jsonl<W: Write + ?Sized>(writer: &mut W, chunks: &[Chunk]) -> Result<()> {
    for chunk in chunks {
        serde_json::to_writer(&mut *writer, chunk).map_err(json_error)?;
        writeln!(writer)?;
    }
    Ok(())
}

/// Write the corpus as a JSON array file, atomically
pub fn write_chunks_json(path: &Path, chunks: &[Chunk]) -> Result<()> {
    write_atomically(path, |writer| write_json(writer, chunks))
}

/// Write the corpus as a JSON Lines file, atomically
pub fn write_chunks_jsonl(path: &Path, chunks: &[Chunk]) -> Result<()> {
    write_atomically(path, |writer| write_jsonl(writer, chunks))
}

/// Run `write` against a temp file beside `path`, then move it into place
pub fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let temp = NamedTempFile::new_in(dir)?;
    let mut writer = BufWriter::new(temp);
    write(&mut writer)?;

    let temp = writer
        .into_inner()
        .map_err(|e| EngineError::IoError(e.error().to_string()))?;
    temp.as_file().sync_all()?;
    temp.persist(path)
        .map_err(|e| EngineError::IoError(format!("Failed to write {}: {}", path.display(), e.error)))?;

    log::debug!("wrote {}", path.display());
    Ok(())
}

fn json_error(err: serde_json::Error) -> EngineError {
    EngineError::IoError(format!("Failed to serialize chunks: {err}"))
}
