//! Command-line interface for repo-explain
//!
//! Subcommands cover the whole pipeline: `index` → `embed` → `search`/`ask`/
//! `chat`, plus `preview` and `info` for inspecting artifacts.

use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod ask;
mod chat;
mod embed;
mod index;
mod info;
mod preview;
mod search;
mod utils;

/// Explain codebases with retrieval-augmented LLM context
#[derive(Parser)]
#[command(name = "repo-explain")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (repo-explain.toml)
    #[arg(short = 'c', long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Index a repository into structural chunks
    Index(index::IndexArgs),

    /// Embed overview chunks and build the vector store
    Embed(embed::EmbedArgs),

    /// Semantic search over the embedded codebase
    Search(search::SearchArgs),

    /// Ask a one-shot question about the codebase
    Ask(ask::AskArgs),

    /// Interactive conversation with persistent memory
    Chat(chat::ChatArgs),

    /// Export a human-readable YAML preview of the chunk artifact
    Preview(preview::PreviewArgs),

    /// Show workspace state and available modes
    Info(info::InfoArgs),

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Wire verbose flag to the tracing log level.
    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    let cwd = std::env::current_dir()?;
    let config = crate::config::load_config(&cwd, cli.config.as_deref())?;

    match cli.command {
        Commands::Index(args) => index::run(args, &config),
        Commands::Embed(args) => embed::run(args, &config),
        Commands::Search(args) => search::run(args, &config),
        Commands::Ask(args) => ask::run(args, &config),
        Commands::Chat(args) => chat::run(args, &config),
        Commands::Preview(args) => preview::run(args, &config),
        Commands::Info(args) => info::run(args, &config),
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "repo-explain",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}
