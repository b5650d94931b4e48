//! Preview command implementation
//!
//! Converts chunks.json into a human-readable YAML preview.

use anyhow::{Context, Result};
use clap::Args;

use crate::config::Config;
use crate::store::chunks::load_chunks;
use crate::store::Workspace;

#[derive(Args)]
pub struct PreviewArgs {}

pub fn run(_args: PreviewArgs, config: &Config) -> Result<()> {
    let workspace = Workspace::new(&config.data_dir);
    let repo = workspace.active_repo()?;

    let chunks = load_chunks(&workspace.chunks_path(&repo))?;
    let yaml = serde_yaml::to_string(&chunks).context("Failed rendering YAML preview")?;

    let preview_path = workspace.preview_path(&repo);
    std::fs::write(&preview_path, yaml)
        .with_context(|| format!("Failed writing {}", preview_path.display()))?;

    println!("YAML preview written to {}", preview_path.display());
    Ok(())
}
