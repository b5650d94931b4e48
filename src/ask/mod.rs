//! Orchestration: retrieval → context assembly → explanation, per mode.
//!
//! All collaborators arrive as explicit dependencies; this layer owns the
//! sequencing and the dry-run short-circuit, nothing else. Memory-aware
//! conversation flows thread the state through as an explicit value and
//! persist it at the end (last-write-wins across processes).

use anyhow::Result;
use serde::Serialize;

use crate::config::Config;
use crate::context::{self, ChunkIndex};
use crate::llm::cost::{estimate_embedding_cost, estimate_llm_cost, LlmCost};
use crate::llm::{build_prompt, LlmClient};
use crate::memory::{build_summarization_prompt, ConversationState, Role};
use crate::modes::{self, ConversationMode};
use crate::store::{ConversationStore, VectorStore};

pub struct AskDeps<'a> {
    pub config: &'a Config,
    pub client: &'a LlmClient,
    pub index: &'a ChunkIndex,
    pub store: &'a VectorStore,
}

#[derive(Debug, Clone, Serialize)]
pub struct RetrievalCost {
    pub embedding_tokens: usize,
    pub estimated_cost: Option<f64>,
}

#[derive(Debug)]
pub struct AskOutcome {
    pub query: String,
    pub mode: ConversationMode,
    pub hits: Vec<crate::domain::RetrievalHit>,
    pub context: String,
    pub answer: Option<String>,
    pub retrieval_cost: Option<RetrievalCost>,
    pub llm_cost: Option<LlmCost>,
    pub dry_run: bool,
}

/// Execute the full pipeline for one query.
///
/// Memory, if any, is injected by the caller — this function is
/// memory-agnostic, which keeps one-shot and conversational flows identical
/// from here down.
pub fn ask(
    deps: &AskDeps,
    query: &str,
    k: usize,
    mode: ConversationMode,
    memory: Option<&str>,
) -> Result<AskOutcome> {
    let policy = modes::policy(mode);

    let retrieval_cost = if policy.use_retrieval {
        let (embedding_tokens, estimated_cost) =
            estimate_embedding_cost(&[query], &deps.config.llm.embedding_model);
        Some(RetrievalCost { embedding_tokens, estimated_cost })
    } else {
        None
    };

    if deps.config.dry_run {
        return Ok(AskOutcome {
            query: query.to_string(),
            mode,
            hits: Vec::new(),
            context: String::new(),
            answer: None,
            retrieval_cost,
            llm_cost: None,
            dry_run: true,
        });
    }

    let hits = if policy.use_retrieval {
        let vector = deps.client.embed_query(query)?;
        deps.store.search(&vector, k)
    } else {
        Vec::new()
    };

    let context = context::assemble(deps.index, &hits, &policy.context_options());

    let mut llm_cost = None;
    let mut answer = None;
    if policy.use_llm {
        let prompt = build_prompt(query, &context, policy.conversational_directive, memory);
        llm_cost = Some(estimate_llm_cost(
            &prompt,
            deps.config.expected_output_tokens,
            &deps.config.llm.chat_model,
        ));
        answer = Some(deps.client.complete(&prompt)?);
    }

    Ok(AskOutcome {
        query: query.to_string(),
        mode,
        hits,
        context,
        answer,
        retrieval_cost,
        llm_cost,
        dry_run: false,
    })
}

/// Compress conversation memory when it has grown past `max_turns`.
///
/// Returns true when a summary was applied. Dry-run leaves memory untouched.
pub fn maybe_summarize(
    client: &LlmClient,
    state: &mut ConversationState,
    max_turns: usize,
    keep_last_n: usize,
    dry_run: bool,
) -> Result<bool> {
    if !state.needs_summarization(max_turns) {
        return Ok(false);
    }
    if dry_run {
        return Ok(false);
    }

    let prompt = build_summarization_prompt(state.summary.as_deref(), &state.recent_turns);
    let new_summary = client.complete(&prompt)?;
    state.apply_summary(&new_summary, keep_last_n);
    Ok(true)
}

#[derive(Debug, Clone, Serialize)]
pub struct MemorySnapshot {
    pub summary_present: bool,
    pub recent_turns: usize,
}

/// Conversational entrypoint: load memory, ask, record turns, maybe
/// compress, persist.
pub fn ask_with_memory(
    deps: &AskDeps,
    conversations: &ConversationStore,
    conversation_id: &str,
    query: &str,
    k: usize,
    mode: ConversationMode,
) -> Result<(AskOutcome, MemorySnapshot)> {
    let mut state = conversations.load(conversation_id)?.unwrap_or_default();

    let memory_context = state.build_memory_context();
    let memory = if memory_context.is_empty() { None } else { Some(memory_context.as_str()) };

    let outcome = ask(deps, query, k, mode, memory)?;

    state.append_turn(Role::User, query);
    if let Some(answer) = &outcome.answer {
        state.append_turn(Role::Assistant, answer);
    }

    maybe_summarize(
        deps.client,
        &mut state,
        deps.config.max_turns,
        deps.config.keep_last_n,
        deps.config.dry_run,
    )?;

    conversations.save(conversation_id, &state)?;

    let snapshot = MemorySnapshot {
        summary_present: state.summary.is_some(),
        recent_turns: state.recent_turns.len(),
    };
    Ok((outcome, snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChunkKind, CodeChunk, EmbeddingRecord};
    use tempfile::TempDir;

    fn dry_config() -> Config {
        Config { dry_run: true, ..Config::default() }
    }

    fn tiny_index() -> ChunkIndex {
        ChunkIndex::new(vec![CodeChunk {
            id: "a.py::f::overview".to_string(),
            file: "a.py".to_string(),
            kind: ChunkKind::FunctionOverview,
            symbol: "f".to_string(),
            text: "Function: f()".to_string(),
            parent_symbols: Vec::new(),
        }])
    }

    fn tiny_store() -> VectorStore {
        VectorStore::build(&[EmbeddingRecord {
            id: "a.py::f::overview".to_string(),
            kind: ChunkKind::FunctionOverview,
            symbol: "f".to_string(),
            file: "a.py".to_string(),
            text: "Function: f()".to_string(),
            parent_symbols: Vec::new(),
            embedding: vec![1.0, 0.0],
        }])
        .expect("store")
    }

    #[test]
    fn dry_run_short_circuits_before_any_network_call() {
        let config = dry_config();
        let client = LlmClient::new(config.llm.clone());
        let index = tiny_index();
        let store = tiny_store();
        let deps = AskDeps { config: &config, client: &client, index: &index, store: &store };

        let outcome =
            ask(&deps, "what does f do?", 5, ConversationMode::Exploration, None).expect("ask");
        assert!(outcome.dry_run);
        assert!(outcome.hits.is_empty());
        assert!(outcome.answer.is_none());
        assert_eq!(outcome.context, "");
        let cost = outcome.retrieval_cost.expect("cost estimate");
        assert!(cost.embedding_tokens > 0);
    }

    #[test]
    fn maybe_summarize_is_a_no_op_below_threshold() {
        let client = LlmClient::new(crate::config::LlmConfig::default());
        let mut state = ConversationState::new();
        state.append_turn(Role::User, "hi");
        let summarized = maybe_summarize(&client, &mut state, 6, 2, false).expect("no network");
        assert!(!summarized);
        assert_eq!(state.recent_turns.len(), 1);
    }

    #[test]
    fn dry_run_never_mutates_memory_during_summarization() {
        let client = LlmClient::new(crate::config::LlmConfig::default());
        let mut state = ConversationState::new();
        for i in 0..9 {
            state.append_turn(Role::User, &format!("turn {i}"));
        }
        let summarized = maybe_summarize(&client, &mut state, 6, 2, true).expect("dry run");
        assert!(!summarized);
        assert_eq!(state.recent_turns.len(), 9);
        assert!(state.summary.is_none());
    }

    #[test]
    fn ask_with_memory_records_the_user_turn_in_dry_run() {
        let tmp = TempDir::new().expect("tmp");
        let config = dry_config();
        let client = LlmClient::new(config.llm.clone());
        let index = tiny_index();
        let store = tiny_store();
        let deps = AskDeps { config: &config, client: &client, index: &index, store: &store };
        let conversations =
            ConversationStore::open(&tmp.path().join("memory.sqlite")).expect("open");

        let (outcome, snapshot) = ask_with_memory(
            &deps,
            &conversations,
            "conv-1",
            "what does f do?",
            5,
            ConversationMode::Exploration,
        )
        .expect("ask");

        assert!(outcome.dry_run);
        assert_eq!(snapshot.recent_turns, 1);
        assert!(!snapshot.summary_present);

        let persisted = conversations.load("conv-1").expect("load").expect("present");
        assert_eq!(persisted.recent_turns.len(), 1);
        assert_eq!(persisted.recent_turns[0].content, "what does f do?");
    }
}
