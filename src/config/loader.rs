//! Config file loading

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::Config;

/// Load configuration: optional TOML file, then environment overrides.
///
/// An explicitly provided path must parse; an auto-discovered file that fails
/// to parse is warned about and ignored.
pub fn load_config(anchor: &Path, config_path: Option<&Path>) -> Result<Config> {
    let config_path_provided = config_path.is_some();

    let discovered = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(anchor),
    };

    let mut config = match discovered {
        None => Config::default(),
        Some(config_file) => {
            let content = std::fs::read_to_string(&config_file)
                .with_context(|| format!("Failed reading config file: {}", config_file.display()))?;
            match parse_toml_config(&content, &config_file) {
                Ok(config) => config,
                Err(e) => {
                    if config_path_provided {
                        return Err(e);
                    }
                    tracing::warn!(
                        "Failed to parse auto-discovered config {}: {}",
                        config_file.display(),
                        e
                    );
                    Config::default()
                }
            }
        }
    };

    apply_env_overrides(&mut config);
    Ok(config)
}

/// Parse TOML config, supporting a nested [repo-explain] section.
fn parse_toml_config(content: &str, config_file: &Path) -> Result<Config> {
    let raw: toml::Value = toml::from_str(content)
        .with_context(|| format!("Invalid TOML syntax: {}", config_file.display()))?;

    let config_val = match raw.get("repo-explain") {
        Some(nested) => nested.clone(),
        None => raw,
    };

    config_val
        .try_into()
        .with_context(|| format!("Invalid TOML config: {}", config_file.display()))
}

fn discover_config(anchor: &Path) -> Option<PathBuf> {
    let candidates = ["repo-explain.toml", ".repo-explain.toml"];

    for candidate in candidates {
        let path = anchor.join(candidate);
        if path.exists() {
            return Some(path);
        }
    }

    None
}

fn apply_env_overrides(config: &mut Config) {
    if let Ok(dir) = std::env::var("REPO_EXPLAIN_DATA_DIR") {
        config.data_dir = PathBuf::from(dir);
    }
    if let Ok(value) = std::env::var("REPO_EXPLAIN_DRY_RUN") {
        config.dry_run = value == "1";
    }
    if let Ok(provider) = std::env::var("LLM_PROVIDER") {
        config.llm.provider = provider;
    }
    if let Ok(url) = std::env::var("LLM_BASE_URL") {
        config.llm.base_url = url;
    }
    if let Ok(model) = std::env::var("LLM_EMBEDDING_MODEL") {
        config.llm.embedding_model = model;
    }
    if let Ok(model) = std::env::var("LLM_CHAT_MODEL") {
        config.llm.chat_model = model;
    }
    if let Ok(key) = std::env::var("LLM_API_KEY") {
        config.llm.api_key = Some(key);
    } else if config.llm.api_key.is_none() {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            config.llm.api_key = Some(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_when_no_config_file() {
        let tmp = TempDir::new().expect("tmp");
        let config = load_config(tmp.path(), None).expect("config");
        assert_eq!(config.retrieve_k, Config::default().retrieve_k);
    }

    #[test]
    fn loads_explicit_toml_config() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("my.toml");
        fs::write(&path, "retrieve_k = 9\ndefault_mode = \"debugging\"\n").expect("write");

        let config = load_config(tmp.path(), Some(&path)).expect("config");
        assert_eq!(config.retrieve_k, 9);
        assert_eq!(config.default_mode, crate::modes::ConversationMode::Debugging);
    }

    #[test]
    fn loads_nested_section() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("nested.toml");
        fs::write(&path, "[repo-explain]\nretrieve_k = 3\n").expect("write");

        let config = load_config(tmp.path(), Some(&path)).expect("config");
        assert_eq!(config.retrieve_k, 3);
    }

    #[test]
    fn explicit_config_with_invalid_type_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "retrieve_k = \"many\"\n").expect("write");

        assert!(load_config(tmp.path(), Some(&path)).is_err());
    }

    #[test]
    fn auto_discovered_invalid_config_soft_fails_to_defaults() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("repo-explain.toml"), "retrieve_k = \"many\"\n")
            .expect("write");

        let config = load_config(tmp.path(), None).expect("should not error");
        assert_eq!(config.retrieve_k, Config::default().retrieve_k);
    }

    #[test]
    fn auto_discovered_valid_config_is_used() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join(".repo-explain.toml"), "max_turns = 10\n").expect("write");

        let config = load_config(tmp.path(), None).expect("config");
        assert_eq!(config.max_turns, 10);
    }
}
