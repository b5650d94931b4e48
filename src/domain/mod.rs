//! Core data model: structural chunks and retrieval hits.
//!
//! A chunk is one meaningful piece of a repository (a module, a class, a
//! method, a function, or the project map) with either embedding-ready
//! overview prose or the full source text. Every code-bearing chunk has an
//! overview companion whose id carries the `::overview` suffix.

use serde::{Deserialize, Serialize};

/// Suffix convention linking an overview chunk to its full-code companion.
pub const OVERVIEW_SUFFIX: &str = "::overview";

/// Id of the single project-map chunk.
pub const PROJECT_CHUNK_ID: &str = "PROJECT::overview";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkKind {
    Project,
    ModuleOverview,
    Module,
    ClassOverview,
    Class,
    MethodOverview,
    Method,
    FunctionOverview,
    Function,
}

impl ChunkKind {
    /// Overview kinds are the embedding targets; full-code kinds are loadable
    /// by id for expansion but never embedded.
    pub fn is_embeddable(self) -> bool {
        matches!(
            self,
            ChunkKind::Project
                | ChunkKind::ModuleOverview
                | ChunkKind::ClassOverview
                | ChunkKind::MethodOverview
                | ChunkKind::FunctionOverview
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChunkKind::Project => "project",
            ChunkKind::ModuleOverview => "module_overview",
            ChunkKind::Module => "module",
            ChunkKind::ClassOverview => "class_overview",
            ChunkKind::Class => "class",
            ChunkKind::MethodOverview => "method_overview",
            ChunkKind::Method => "method",
            ChunkKind::FunctionOverview => "function_overview",
            ChunkKind::Function => "function",
        }
    }
}

/// One structural unit of source code.
///
/// `parent_symbols` is populated only on `class_overview` chunks and carries
/// the direct base-class names as a typed relation. The overview text still
/// renders an "Inherits from:" section for embedding and display, but ancestry
/// expansion reads the typed field, never the prose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeChunk {
    pub id: String,
    pub file: String,
    #[serde(rename = "type")]
    pub kind: ChunkKind,
    pub symbol: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parent_symbols: Vec<String>,
}

/// Strip the `::overview` suffix to obtain the full-code companion id.
pub fn base_id(id: &str) -> &str {
    id.strip_suffix(OVERVIEW_SUFFIX).unwrap_or(id)
}

/// An embedded overview chunk as persisted in `embeddings.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ChunkKind,
    pub symbol: String,
    pub file: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parent_symbols: Vec<String>,
    pub embedding: Vec<f32>,
}

impl EmbeddingRecord {
    pub fn from_chunk(chunk: &CodeChunk, embedding: Vec<f32>) -> Self {
        EmbeddingRecord {
            id: chunk.id.clone(),
            kind: chunk.kind,
            symbol: chunk.symbol.clone(),
            file: chunk.file.clone(),
            text: chunk.text.clone(),
            parent_symbols: chunk.parent_symbols.clone(),
            embedding,
        }
    }
}

/// One ranked retrieval result. Hits arrive rank-sorted descending from the
/// vector store; the assembler trusts the order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalHit {
    pub chunk_id: String,
    pub score: f32,
}

/// Per-request expansion policy derived from the selected mode.
#[derive(Debug, Clone, Copy)]
pub struct ContextOptions {
    pub prefer_full_code: bool,
    pub expand_inheritance_depth: usize,
    pub inject_project_overview: bool,
}
