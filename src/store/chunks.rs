//! Chunk and embedding artifacts on disk.
//!
//! `chunks.json` holds every structural chunk; `embeddings.json` holds the
//! embedded overview records. Load failures surface as `DataUnavailable` —
//! the one hard failure the assembly path is allowed to raise.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

use crate::domain::{CodeChunk, EmbeddingRecord};
use crate::error::Error;

pub fn load_chunks(path: &Path) -> Result<Vec<CodeChunk>, Error> {
    let data = fs::read_to_string(path).map_err(|e| Error::data_unavailable(path, e))?;
    serde_json::from_str(&data).map_err(|e| Error::data_unavailable(path, e))
}

pub fn save_chunks(path: &Path, chunks: &[CodeChunk]) -> Result<()> {
    write_json(path, chunks)
}

pub fn load_embeddings(path: &Path) -> Result<Vec<EmbeddingRecord>, Error> {
    let data = fs::read_to_string(path).map_err(|e| Error::data_unavailable(path, e))?;
    serde_json::from_str(&data).map_err(|e| Error::data_unavailable(path, e))
}

pub fn save_embeddings(path: &Path, records: &[EmbeddingRecord]) -> Result<()> {
    write_json(path, records)
}

fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed creating {}", parent.display()))?;
    }
    let data = serde_json::to_string_pretty(value).context("Failed serializing artifact")?;
    fs::write(path, data).with_context(|| format!("Failed writing {}", path.display()))?;
    Ok(())
}

/// Short content fingerprint of an artifact, used to detect that embeddings
/// went stale against a re-indexed chunks file.
pub fn fingerprint(path: &Path) -> Result<String, Error> {
    let data = fs::read(path).map_err(|e| Error::data_unavailable(path, e))?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    let digest = format!("{:x}", hasher.finalize());
    Ok(digest[..16].to_string())
}
