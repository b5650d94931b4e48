//! Brute-force cosine nearest-neighbor store.
//!
//! Vectors are L2-normalized at build time so the inner product equals cosine
//! similarity. Search is exhaustive — repositories index tens of thousands of
//! overviews at most, well inside brute-force territory.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::{EmbeddingRecord, RetrievalHit};
use crate::error::Error;

#[derive(Debug, Serialize, Deserialize)]
pub struct VectorStore {
    dim: usize,
    ids: Vec<String>,
    vectors: Vec<Vec<f32>>,
    /// Fingerprint of the chunks file the embeddings were built from.
    pub chunks_fingerprint: Option<String>,
}

impl VectorStore {
    /// Build from embedding records. All vectors must share one dimension.
    pub fn build(records: &[EmbeddingRecord]) -> Result<Self> {
        if records.is_empty() {
            anyhow::bail!("No embedding records to build a vector store from");
        }

        let dim = records[0].embedding.len();
        let mut ids = Vec::with_capacity(records.len());
        let mut vectors = Vec::with_capacity(records.len());

        for record in records {
            if record.embedding.len() != dim {
                anyhow::bail!(
                    "Embedding dimension mismatch for {}: expected {}, got {}",
                    record.id,
                    dim,
                    record.embedding.len()
                );
            }
            let mut vector = record.embedding.clone();
            normalize(&mut vector);
            ids.push(record.id.clone());
            vectors.push(vector);
        }

        Ok(VectorStore { dim, ids, vectors, chunks_fingerprint: None })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed creating {}", parent.display()))?;
        }
        let data = serde_json::to_string(self).context("Failed serializing vector store")?;
        fs::write(path, data).with_context(|| format!("Failed writing {}", path.display()))?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let data = fs::read_to_string(path).map_err(|e| Error::data_unavailable(path, e))?;
        serde_json::from_str(&data).map_err(|e| Error::data_unavailable(path, e))
    }

    /// Top-k cosine search, descending by score with id tie-breaking so the
    /// ranking is deterministic.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<RetrievalHit> {
        if query.len() != self.dim {
            tracing::warn!(
                expected = self.dim,
                got = query.len(),
                "query vector dimension mismatch; returning no hits"
            );
            return Vec::new();
        }

        let mut normalized = query.to_vec();
        normalize(&mut normalized);

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, dot(&normalized, v)))
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| self.ids[a.0].cmp(&self.ids[b.0]))
        });
        scored.truncate(k);

        scored
            .into_iter()
            .map(|(i, score)| RetrievalHit { chunk_id: self.ids[i].clone(), score })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }
}

fn normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
