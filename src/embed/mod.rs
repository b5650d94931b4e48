//! Embedding pipeline: filter embeddable chunks, preview cost, embed.
//!
//! Overview chunks (and the project map) are the only embedding targets;
//! full-code chunks stay local and are loaded by id during context assembly.

use std::collections::BTreeMap;

use anyhow::Result;
use indicatif::ProgressBar;

use crate::domain::{CodeChunk, EmbeddingRecord};
use crate::llm::cost::estimate_embedding_cost;
use crate::llm::LlmClient;

const EMBED_BATCH_SIZE: usize = 64;

/// The filter report and cost preview shown before any API spend.
#[derive(Debug)]
pub struct EmbedPlan {
    pub total_chunks: usize,
    pub embeddable: usize,
    pub ignored_by_kind: BTreeMap<&'static str, usize>,
    pub estimated_tokens: usize,
    pub estimated_cost: Option<f64>,
}

pub fn embeddable_chunks(chunks: &[CodeChunk]) -> Vec<&CodeChunk> {
    chunks.iter().filter(|c| c.kind.is_embeddable()).collect()
}

pub fn plan(chunks: &[CodeChunk], embedding_model: &str) -> EmbedPlan {
    let embeddable = embeddable_chunks(chunks);
    let texts: Vec<&str> = embeddable.iter().map(|c| c.text.as_str()).collect();
    let (estimated_tokens, estimated_cost) = estimate_embedding_cost(&texts, embedding_model);

    let mut ignored_by_kind: BTreeMap<&'static str, usize> = BTreeMap::new();
    for chunk in chunks.iter().filter(|c| !c.kind.is_embeddable()) {
        *ignored_by_kind.entry(chunk.kind.as_str()).or_insert(0) += 1;
    }

    EmbedPlan {
        total_chunks: chunks.len(),
        embeddable: embeddable.len(),
        ignored_by_kind,
        estimated_tokens,
        estimated_cost,
    }
}

/// Embed every embeddable chunk, preserving chunk order in the output.
pub fn embed_chunks(client: &LlmClient, chunks: &[CodeChunk]) -> Result<Vec<EmbeddingRecord>> {
    let embeddable = embeddable_chunks(chunks);
    if embeddable.is_empty() {
        return Ok(Vec::new());
    }

    let progress = ProgressBar::new(embeddable.len() as u64);
    let mut records = Vec::with_capacity(embeddable.len());

    for batch in embeddable.chunks(EMBED_BATCH_SIZE) {
        let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
        let vectors = client.embed_batch(&texts)?;
        if vectors.len() != batch.len() {
            anyhow::bail!(
                "Embedding API returned {} vectors for {} inputs",
                vectors.len(),
                batch.len()
            );
        }
        for (chunk, vector) in batch.iter().zip(vectors) {
            records.push(EmbeddingRecord::from_chunk(chunk, vector));
        }
        progress.inc(batch.len() as u64);
    }

    progress.finish_and_clear();
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ChunkKind;

    fn chunk(id: &str, kind: ChunkKind, text: &str) -> CodeChunk {
        CodeChunk {
            id: id.to_string(),
            file: "a.py".to_string(),
            kind,
            symbol: id.to_string(),
            text: text.to_string(),
            parent_symbols: Vec::new(),
        }
    }

    #[test]
    fn plan_separates_embeddable_from_ignored() {
        let chunks = vec![
            chunk("PROJECT::overview", ChunkKind::Project, "map"),
            chunk("a.py::module::overview", ChunkKind::ModuleOverview, "abcdefgh"),
            chunk("a.py::module", ChunkKind::Module, "import os"),
            chunk("a.py::f", ChunkKind::Function, "def f(): pass"),
        ];
        let plan = plan(&chunks, "text-embedding-3-large");
        assert_eq!(plan.total_chunks, 4);
        assert_eq!(plan.embeddable, 2);
        assert_eq!(plan.ignored_by_kind.get("module"), Some(&1));
        assert_eq!(plan.ignored_by_kind.get("function"), Some(&1));
        assert!(plan.estimated_cost.is_some());
        assert!(plan.estimated_tokens >= 2);
    }

    #[test]
    fn no_embeddable_chunks_short_circuits() {
        let client = LlmClient::new(crate::config::LlmConfig::default());
        let chunks = vec![chunk("a.py::module", ChunkKind::Module, "code")];
        let records = embed_chunks(&client, &chunks).expect("no network needed");
        assert!(records.is_empty());
    }
}
