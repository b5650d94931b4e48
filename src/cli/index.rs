//! Index command implementation

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::utils::parse_csv;
use crate::config::Config;
use crate::index::{index_repository, IndexOptions};
use crate::store::chunks::save_chunks;
use crate::store::workspace::{repo_name_from_path, Workspace};

#[derive(Args)]
pub struct IndexArgs {
    /// Repository root to index
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Repository name (defaults to the directory name)
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Exclude paths matching these globs (comma-separated)
    #[arg(short = 'e', long, value_name = "GLOBS")]
    pub exclude_glob: Option<String>,

    /// Ignore .gitignore rules
    #[arg(long)]
    pub no_gitignore: bool,
}

pub fn run(args: IndexArgs, config: &Config) -> Result<()> {
    if !args.path.is_dir() {
        anyhow::bail!("Not a directory: {}", args.path.display());
    }

    let repo_name = args.name.clone().unwrap_or_else(|| repo_name_from_path(&args.path));
    let options = IndexOptions {
        exclude_globs: parse_csv(&args.exclude_glob),
        no_gitignore: args.no_gitignore,
    };

    let chunks = index_repository(&args.path, &options)?;

    let workspace = Workspace::new(&config.data_dir);
    let chunks_path = workspace.chunks_path(&repo_name);
    save_chunks(&chunks_path, &chunks)?;
    workspace.set_active_repo(&repo_name)?;

    println!("Indexed {} chunks.", chunks.len());
    println!("Saved to {}", chunks_path.display());
    println!("Active repository: {repo_name}");
    Ok(())
}
