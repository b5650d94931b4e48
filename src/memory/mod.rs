//! Conversation memory: rolling turns plus a compressed summary.
//!
//! This module owns the domain logic only — when to compress, how to render
//! memory into prompt text, how to fold a new summary in. It never talks to
//! the model and never knows how state is persisted; both live in the
//! orchestration and store layers.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationState {
    pub summary: Option<String>,
    pub recent_turns: Vec<ConversationTurn>,
}

impl ConversationState {
    pub fn new() -> Self {
        ConversationState::default()
    }

    pub fn append_turn(&mut self, role: Role, content: &str) {
        self.recent_turns.push(ConversationTurn { role, content: content.trim().to_string() });
    }

    /// Strict inequality: exactly `max_turns` turns does not trigger.
    pub fn needs_summarization(&self, max_turns: usize) -> bool {
        self.recent_turns.len() > max_turns
    }

    /// Replace the summary and keep only the last `keep_last_n` turns; older
    /// turns are assumed folded into the new summary.
    pub fn apply_summary(&mut self, new_summary: &str, keep_last_n: usize) {
        self.summary = Some(new_summary.to_string());
        let len = self.recent_turns.len();
        if len > keep_last_n {
            self.recent_turns.drain(..len - keep_last_n);
        }
    }

    /// Render memory for prompt injection: summary first, then recent turns as
    /// role-labeled lines. Empty string for a fresh conversation.
    pub fn build_memory_context(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        if let Some(summary) = &self.summary {
            parts.push("Conversation summary:".to_string());
            parts.push(summary.clone());
        }

        if !self.recent_turns.is_empty() {
            parts.push("\nRecent conversation:".to_string());
            for turn in &self.recent_turns {
                parts.push(format!("{}: {}", turn.role.label(), turn.content));
            }
        }

        parts.join("\n").trim().to_string()
    }
}

/// Deterministic compression prompt. The compression itself is delegated to
/// the LLM collaborator; only the template is owned here.
pub fn build_summarization_prompt(summary: Option<&str>, turns: &[ConversationTurn]) -> String {
    let previous_summary = summary.unwrap_or("None");

    let dialogue: Vec<String> =
        turns.iter().map(|t| format!("{}: {}", t.role.label(), t.content)).collect();

    format!(
        "You are summarizing a technical conversation between a user and an assistant.\n\
         \n\
         Your goal:\n\
         - Preserve key facts, decisions, and explanations\n\
         - Remove repetition and irrelevant details\n\
         - Keep it short and precise\n\
         - Assume the reader is technical\n\
         \n\
         Previous summary:\n\
         {previous_summary}\n\
         \n\
         New dialogue to integrate:\n\
         {dialogue}\n\
         \n\
         Produce an updated summary:",
        dialogue = dialogue.join("\n")
    )
}
