//! Ask command implementation

use anyhow::Result;
use clap::Args;

use crate::ask::{ask, AskDeps};
use crate::config::Config;
use crate::context::ChunkIndex;
use crate::llm::LlmClient;
use crate::modes::ConversationMode;
use crate::store::{VectorStore, Workspace};

#[derive(Args)]
pub struct AskArgs {
    /// Question about the codebase
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Conversation mode
    #[arg(long, value_enum)]
    pub mode: Option<ConversationMode>,

    /// Number of chunks to retrieve
    #[arg(short = 'k', long = "top-k", value_name = "COUNT", default_value_t = 5)]
    pub k: usize,

    /// Print the assembled context before the answer
    #[arg(long)]
    pub show_context: bool,
}

pub fn run(args: AskArgs, config: &Config) -> Result<()> {
    let workspace = Workspace::new(&config.data_dir);
    let repo = workspace.active_repo()?;

    let index = ChunkIndex::load(&workspace.chunks_path(&repo))?;
    let store = VectorStore::load(&workspace.vector_store_path(&repo))?;
    super::search::warn_if_stale(&store, &workspace, &repo);

    let client = LlmClient::new(config.llm.clone());
    let deps = AskDeps { config, client: &client, index: &index, store: &store };
    let mode = args.mode.unwrap_or(config.default_mode);

    let outcome = ask(&deps, &args.query, args.k, mode, None)?;

    if outcome.dry_run {
        println!("Dry run - no retrieval or explanation performed.");
        if let Some(cost) = &outcome.retrieval_cost {
            println!("Embedding tokens: {}", cost.embedding_tokens);
        }
        return Ok(());
    }

    if args.show_context {
        println!("{}", outcome.context);
        println!();
    }

    match &outcome.answer {
        Some(answer) => {
            println!("=== ANSWER ===\n");
            println!("{answer}");
            if let Some(cost) = &outcome.llm_cost {
                if let Some(dollars) = cost.estimated_cost {
                    tracing::debug!(
                        input_tokens = cost.input_tokens,
                        estimated_cost = dollars,
                        "explanation cost"
                    );
                }
            }
        }
        None => {
            // search mode: locations only
            println!("Top matches for: {}", args.query);
            for hit in &outcome.hits {
                match index.overview(&hit.chunk_id) {
                    Some(overview) => {
                        println!("- {} (score {:.3}) {}", overview.symbol, hit.score, overview.file)
                    }
                    None => println!("- {} (score {:.3})", hit.chunk_id, hit.score),
                }
            }
        }
    }
    Ok(())
}
