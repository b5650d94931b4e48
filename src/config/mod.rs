//! Configuration: models, pricing mode, workspace location, memory budgets.
//!
//! Precedence: environment > config file > defaults. The config file is
//! optional and discovered next to the working directory; an explicitly
//! passed path must parse, an auto-discovered one soft-fails to defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::modes::{ConversationMode, DEFAULT_MODE};

pub mod loader;

pub use loader::load_config;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the assistant's data workspace.
    pub data_dir: PathBuf,
    /// Skip all paid API calls; report estimates instead.
    pub dry_run: bool,
    /// Mode used when the caller does not pick one.
    pub default_mode: ConversationMode,
    /// Top-k chunks retrieved per query.
    pub retrieve_k: usize,
    /// Turn count above which conversation memory is compressed.
    pub max_turns: usize,
    /// Turns kept verbatim after compression.
    pub keep_last_n: usize,
    /// Output-token estimate used for cost previews.
    pub expected_output_tokens: usize,
    pub llm: LlmConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from(".repo-explain"),
            dry_run: false,
            default_mode: DEFAULT_MODE,
            retrieve_k: 5,
            max_turns: 6,
            keep_last_n: 2,
            expected_output_tokens: 400,
            llm: LlmConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// "openai" or "ollama"
    pub provider: String,
    pub base_url: String,
    /// API key for cloud providers; read from the environment by default.
    pub api_key: Option<String>,
    pub embedding_model: String,
    pub chat_model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        LlmConfig {
            provider: "openai".to_string(),
            base_url: "https://api.openai.com".to_string(),
            api_key: None,
            embedding_model: "text-embedding-3-large".to_string(),
            chat_model: "gpt-4.1-mini".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.data_dir, PathBuf::from(".repo-explain"));
        assert_eq!(config.retrieve_k, 5);
        assert_eq!(config.max_turns, 6);
        assert_eq!(config.keep_last_n, 2);
        assert_eq!(config.default_mode, ConversationMode::Exploration);
        assert_eq!(config.llm.provider, "openai");
        assert_eq!(config.llm.embedding_model, "text-embedding-3-large");
        assert_eq!(config.llm.chat_model, "gpt-4.1-mini");
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: Config =
            toml::from_str("dry_run = true\n[llm]\nprovider = \"ollama\"\n").expect("parse");
        assert!(config.dry_run);
        assert_eq!(config.llm.provider, "ollama");
        assert_eq!(config.retrieve_k, 5);
        assert_eq!(config.llm.chat_model, "gpt-4.1-mini");
    }
}
