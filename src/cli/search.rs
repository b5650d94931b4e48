//! Search command implementation

use anyhow::Result;
use clap::Args;

use crate::config::Config;
use crate::context::ChunkIndex;
use crate::llm::cost::estimate_embedding_cost;
use crate::llm::LlmClient;
use crate::store::chunks::fingerprint;
use crate::store::{VectorStore, Workspace};

#[derive(Args)]
pub struct SearchArgs {
    /// Natural-language query
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Number of chunks to retrieve
    #[arg(short = 'k', long = "top-k", value_name = "COUNT", default_value_t = 5)]
    pub k: usize,
}

pub fn run(args: SearchArgs, config: &Config) -> Result<()> {
    let workspace = Workspace::new(&config.data_dir);
    let repo = workspace.active_repo()?;

    let store = VectorStore::load(&workspace.vector_store_path(&repo))?;
    let index = ChunkIndex::load(&workspace.chunks_path(&repo))?;
    warn_if_stale(&store, &workspace, &repo);

    let (tokens, cost) = estimate_embedding_cost(&[&args.query], &config.llm.embedding_model);
    if config.dry_run {
        println!("Dry run - retrieval skipped.");
        println!("Embedding tokens: {tokens}");
        if let Some(cost) = cost {
            println!("Estimated cost ($): {cost:.6}");
        }
        return Ok(());
    }

    let client = LlmClient::new(config.llm.clone());
    let vector = client.embed_query(&args.query)?;
    let hits = store.search(&vector, args.k);

    if hits.is_empty() {
        println!("No matches found. Try broadening the query.");
        return Ok(());
    }

    println!("Top matches for: {}", args.query);
    for hit in &hits {
        match index.overview(&hit.chunk_id) {
            Some(overview) => println!(
                "- {} (score {:.3}) [{}] {}",
                overview.symbol,
                hit.score,
                overview.kind.as_str(),
                overview.file
            ),
            None => println!("- {} (score {:.3}) [stale id]", hit.chunk_id, hit.score),
        }
    }
    Ok(())
}

pub fn warn_if_stale(store: &VectorStore, workspace: &Workspace, repo: &str) {
    if let Some(stored) = &store.chunks_fingerprint {
        if let Ok(current) = fingerprint(&workspace.chunks_path(repo)) {
            if *stored != current {
                tracing::warn!(
                    "chunks.json changed since embeddings were built; run `repo-explain embed`"
                );
            }
        }
    }
}
