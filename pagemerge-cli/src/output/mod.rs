//! Output formatting module

use anyhow::{Context, Result};
use pagemerge_engine::{
    output::{write_json, write_jsonl},
    write_chunks_json, write_chunks_jsonl, Chunk,
};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::path::Path;

/// Supported corpus formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed JSON array of chunks
    #[default]
    Json,
    /// One compact JSON chunk per line
    Jsonl,
}

impl OutputFormat {
    /// Write chunks to an arbitrary writer
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W, chunks: &[Chunk]) -> Result<()> {
        match self {
            OutputFormat::Json => write_json(writer, chunks)?,
            OutputFormat::Jsonl => write_jsonl(writer, chunks)?,
        }
        Ok(())
    }

    /// Write chunks to `path` atomically
    pub fn write_file(&self, path: &Path, chunks: &[Chunk]) -> Result<()> {
        match self {
            OutputFormat::Json => write_chunks_json(path, chunks),
            OutputFormat::Jsonl => write_chunks_jsonl(path, chunks),
        }
        .with_context(|| format!("Failed to write {}", path.display()))
    }
}

/// Emit the corpus to a file when given, stdout otherwise
pub fn emit(format: OutputFormat, path: Option<&Path>, chunks: &[Chunk]) -> Result<()> {
    match path {
        Some(path) => format.write_file(path, chunks),
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            format
                .write_to(&mut handle, chunks)
                .context("Failed to write to stdout")?;
            handle.flush().context("Failed to flush stdout")
        }
    }
}
