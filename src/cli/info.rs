//! Info command implementation

use anyhow::Result;
use clap::Args;

use crate::config::Config;
use crate::context::ChunkIndex;
use crate::modes::list_modes;
use crate::store::{VectorStore, Workspace};

#[derive(Args)]
pub struct InfoArgs {}

pub fn run(_args: InfoArgs, config: &Config) -> Result<()> {
    let workspace = Workspace::new(&config.data_dir);

    println!("Data directory: {}", workspace.data_root().display());
    println!("LLM provider:   {}", config.llm.provider);
    println!("Chat model:     {}", config.llm.chat_model);
    println!("Embedding model: {}", config.llm.embedding_model);

    match workspace.active_repo() {
        Err(_) => println!("\nActive repository: none (run `repo-explain index <PATH>`)"),
        Ok(repo) => {
            println!("\nActive repository: {repo}");
            match ChunkIndex::load(&workspace.chunks_path(&repo)) {
                Ok(index) => println!(
                    "Chunks: {} overviews, {} full-code records, project map: {}",
                    index.overview_count(),
                    index.full_count(),
                    if index.project().is_some() { "yes" } else { "no" }
                ),
                Err(_) => println!("Chunks: not indexed"),
            }
            match VectorStore::load(&workspace.vector_store_path(&repo)) {
                Ok(store) => {
                    println!("Vector store: {} vectors (dim {})", store.len(), store.dim())
                }
                Err(_) => println!("Vector store: not built (run `repo-explain embed`)"),
            }
        }
    }

    println!("\nModes:");
    for (id, description) in list_modes() {
        println!("  {id:<14} {description}");
    }
    Ok(())
}
