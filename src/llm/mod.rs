//! LLM collaborators: embeddings and chat completions over HTTP, plus
//! deterministic prompt construction and cost estimation.
//!
//! The client is an explicit dependency constructed once at the CLI layer and
//! passed down — never a process-wide singleton.

pub mod client;
pub mod cost;
pub mod prompt;

pub use client::LlmClient;
pub use prompt::build_prompt;
