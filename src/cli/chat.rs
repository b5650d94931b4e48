//! Chat command implementation
//!
//! REPL with SQLite-backed conversation memory. Exit with Ctrl+C, Ctrl+D,
//! or `exit`.

use anyhow::Result;
use clap::Args;
use console::style;
use dialoguer::Input;
use uuid::Uuid;

use crate::ask::{ask_with_memory, AskDeps};
use crate::config::Config;
use crate::context::ChunkIndex;
use crate::llm::LlmClient;
use crate::modes::ConversationMode;
use crate::store::{ConversationStore, VectorStore, Workspace};

#[derive(Args)]
pub struct ChatArgs {
    /// Conversation ID to resume (default: new conversation)
    #[arg(long, value_name = "ID")]
    pub conversation_id: Option<String>,

    /// Conversation mode
    #[arg(long, value_enum)]
    pub mode: Option<ConversationMode>,

    /// Number of chunks to retrieve per query
    #[arg(short = 'k', long = "top-k", value_name = "COUNT", default_value_t = 5)]
    pub k: usize,
}

pub fn run(args: ChatArgs, config: &Config) -> Result<()> {
    let workspace = Workspace::new(&config.data_dir);
    let repo = workspace.active_repo()?;

    let conversation_id =
        args.conversation_id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
    let mode = args.mode.unwrap_or(config.default_mode);

    let index = ChunkIndex::load(&workspace.chunks_path(&repo))?;
    let store = VectorStore::load(&workspace.vector_store_path(&repo))?;
    let conversations = ConversationStore::open(&workspace.memory_db_path(&repo))?;
    let client = LlmClient::new(config.llm.clone());
    let deps = AskDeps { config, client: &client, index: &index, store: &store };

    println!("{}", style("Conversational explanation session").cyan().bold());
    println!("Active repository: {}", style(&repo).green());
    println!("Conversation ID:   {conversation_id}");
    println!("Mode:              {mode}");
    println!("Type 'exit' or press Ctrl+C to quit.\n");

    loop {
        let line: String = match Input::new().with_prompt(">>>").allow_empty(true).interact_text()
        {
            Ok(line) => line,
            Err(_) => break,
        };

        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if query.eq_ignore_ascii_case("exit") || query.eq_ignore_ascii_case("quit") {
            break;
        }

        let (outcome, snapshot) =
            ask_with_memory(&deps, &conversations, &conversation_id, query, args.k, mode)?;

        println!("\n=== ANSWER ===\n");
        match &outcome.answer {
            Some(answer) => println!("{answer}"),
            None if outcome.dry_run => println!("[dry run]"),
            None => {
                for hit in &outcome.hits {
                    match index.overview(&hit.chunk_id) {
                        Some(overview) => println!(
                            "- {} (score {:.3}) {}",
                            overview.symbol, hit.score, overview.file
                        ),
                        None => println!("- {} (score {:.3})", hit.chunk_id, hit.score),
                    }
                }
            }
        }

        println!("\n=== MEMORY ===");
        println!("Summary present: {}", snapshot.summary_present);
        println!("Recent turns:    {}\n", snapshot.recent_turns);
    }

    println!("Conversation ended");
    Ok(())
}
