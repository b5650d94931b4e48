//! repo-explain: retrieval-augmented explanations for source repositories
//!
//! Indexes a codebase into structural chunks, embeds the chunk overviews,
//! retrieves relevant chunks for a question, assembles an expanded context
//! (including class-ancestry expansion), and asks a language model to
//! explain — with per-mode policies controlling how much code, how much
//! ancestry, and how much project map the model sees.

pub mod ask;
pub mod cli;
pub mod config;
pub mod context;
pub mod domain;
pub mod embed;
pub mod error;
pub mod index;
pub mod llm;
pub mod memory;
pub mod modes;
pub mod store;
pub mod utils;
