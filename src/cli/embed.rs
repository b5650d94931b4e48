//! Embed command implementation

use anyhow::Result;
use clap::Args;

use crate::config::Config;
use crate::embed;
use crate::llm::LlmClient;
use crate::store::chunks::{fingerprint, load_chunks, save_embeddings};
use crate::store::{VectorStore, Workspace};

#[derive(Args)]
pub struct EmbedArgs {
    /// Show the filter report and cost estimate without calling the API
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(args: EmbedArgs, config: &Config) -> Result<()> {
    let workspace = Workspace::new(&config.data_dir);
    let repo = workspace.active_repo()?;
    let chunks_path = workspace.chunks_path(&repo);
    let chunks = load_chunks(&chunks_path)?;

    let plan = embed::plan(&chunks, &config.llm.embedding_model);
    println!("=== EMBEDDING FILTER RESULT ===");
    println!("Total chunks:   {}", plan.total_chunks);
    println!("Will embed:     {}", plan.embeddable);
    println!("Ignored:        {}\n", plan.total_chunks - plan.embeddable);
    println!("Ignored by type:");
    for (kind, count) in &plan.ignored_by_kind {
        println!("  - {kind:<18} {count}");
    }
    println!("==============================");
    println!("Estimated embedding tokens: {}", plan.estimated_tokens);
    match plan.estimated_cost {
        Some(cost) => println!("Estimated cost ($):         {cost:.4}"),
        None => println!("Estimated cost ($):         unknown model pricing"),
    }

    if args.dry_run || config.dry_run {
        println!("Dry run - no embedding performed.");
        return Ok(());
    }

    let client = LlmClient::new(config.llm.clone());
    let records = embed::embed_chunks(&client, &chunks)?;
    if records.is_empty() {
        println!("Nothing to embed.");
        return Ok(());
    }

    let embeddings_path = workspace.embeddings_path(&repo);
    save_embeddings(&embeddings_path, &records)?;

    let mut store = VectorStore::build(&records)?;
    store.chunks_fingerprint = Some(fingerprint(&chunks_path)?);
    let store_path = workspace.vector_store_path(&repo);
    store.save(&store_path)?;

    println!("Embedded {} chunks.", records.len());
    println!("Embeddings: {}", embeddings_path.display());
    println!("Store:      {}", store_path.display());
    Ok(())
}
