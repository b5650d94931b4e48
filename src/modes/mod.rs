//! Conversation modes and their declarative policies.
//!
//! A mode is a policy: what kind of retrieval is preferred, whether LLM
//! reasoning runs, how much code and ancestry the context carries, and how
//! the answer should be framed. Modes are explicit and selected by the user,
//! never inferred. The table is static configuration — policies contain no
//! logic and are never mutated.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::domain::ContextOptions;
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ConversationMode {
    Search,
    Documentation,
    Debugging,
    Coding,
    Architecture,
    Exploration,
    Full,
}

pub const ALL_MODES: [ConversationMode; 7] = [
    ConversationMode::Search,
    ConversationMode::Documentation,
    ConversationMode::Debugging,
    ConversationMode::Coding,
    ConversationMode::Architecture,
    ConversationMode::Exploration,
    ConversationMode::Full,
];

pub const DEFAULT_MODE: ConversationMode = ConversationMode::Exploration;

impl ConversationMode {
    /// Stable external identifier, safe to store in DBs, JSON, and URLs.
    pub fn as_str(self) -> &'static str {
        match self {
            ConversationMode::Search => "search",
            ConversationMode::Documentation => "documentation",
            ConversationMode::Debugging => "debugging",
            ConversationMode::Coding => "coding",
            ConversationMode::Architecture => "architecture",
            ConversationMode::Exploration => "exploration",
            ConversationMode::Full => "full",
        }
    }
}

impl fmt::Display for ConversationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConversationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "search" => Ok(ConversationMode::Search),
            "documentation" => Ok(ConversationMode::Documentation),
            "debugging" => Ok(ConversationMode::Debugging),
            "coding" => Ok(ConversationMode::Coding),
            "architecture" => Ok(ConversationMode::Architecture),
            "exploration" => Ok(ConversationMode::Exploration),
            "full" => Ok(ConversationMode::Full),
            other => Err(Error::UnknownMode(other.to_string())),
        }
    }
}

/// Declarative policy describing how a mode behaves.
#[derive(Debug, Clone, Copy)]
pub struct ModePolicy {
    pub use_retrieval: bool,
    pub use_llm: bool,
    pub prefer_full_code: bool,
    pub expand_inheritance_depth: usize,
    pub inject_project_overview: bool,
    pub conversational_directive: &'static str,
    pub description: &'static str,
}

impl ModePolicy {
    pub fn context_options(&self) -> ContextOptions {
        ContextOptions {
            prefer_full_code: self.prefer_full_code,
            expand_inheritance_depth: self.expand_inheritance_depth,
            inject_project_overview: self.inject_project_overview,
        }
    }
}

/// The policy table. Exhaustive by construction: a new mode without a policy
/// fails to compile here rather than at lookup time.
pub fn policy(mode: ConversationMode) -> ModePolicy {
    match mode {
        ConversationMode::Search => ModePolicy {
            use_retrieval: true,
            use_llm: false,
            prefer_full_code: false,
            expand_inheritance_depth: 0,
            inject_project_overview: false,
            conversational_directive: "Locate relevant code elements and report where they are \
                                       defined. Do not explain behavior unless explicitly asked.",
            description: "Fast semantic search for code locations.",
        },
        ConversationMode::Documentation => ModePolicy {
            use_retrieval: true,
            use_llm: true,
            prefer_full_code: false,
            expand_inheritance_depth: 1,
            inject_project_overview: true,
            conversational_directive: "Explain what the code does and how it is intended to be \
                                       used. Focus on purpose and responsibilities, not \
                                       implementation details.",
            description: "Generate documentation-style explanations.",
        },
        ConversationMode::Debugging => ModePolicy {
            use_retrieval: true,
            use_llm: true,
            prefer_full_code: true,
            expand_inheritance_depth: 2,
            inject_project_overview: false,
            conversational_directive: "Explain runtime behavior, edge cases, and failure modes. \
                                       Focus on why things happen and what could go wrong.",
            description: "Reason about bugs, crashes, and unexpected behavior.",
        },
        ConversationMode::Coding => ModePolicy {
            use_retrieval: true,
            use_llm: true,
            prefer_full_code: true,
            expand_inheritance_depth: 1,
            inject_project_overview: false,
            conversational_directive: "Provide concrete implementation guidance. Use code \
                                       snippets where appropriate. Avoid vague advice.",
            description: "Assist with writing or modifying code.",
        },
        ConversationMode::Architecture => ModePolicy {
            use_retrieval: true,
            use_llm: true,
            prefer_full_code: false,
            expand_inheritance_depth: 3,
            inject_project_overview: true,
            conversational_directive: "Explain system structure and interactions between \
                                       components. Focus on design intent and data flow.",
            description: "High-level system and architectural explanations.",
        },
        ConversationMode::Exploration => ModePolicy {
            use_retrieval: true,
            use_llm: true,
            prefer_full_code: false,
            expand_inheritance_depth: 0,
            inject_project_overview: true,
            conversational_directive: "Explore the codebase and explain relevant parts clearly. \
                                       Balance overview with detail.",
            description: "General-purpose exploratory mode.",
        },
        ConversationMode::Full => ModePolicy {
            use_retrieval: true,
            use_llm: true,
            prefer_full_code: true,
            expand_inheritance_depth: 3,
            inject_project_overview: true,
            conversational_directive: "Full details",
            description: "Full detailed mode",
        },
    }
}

/// Available modes with descriptions, for UI listings.
pub fn list_modes() -> Vec<(&'static str, &'static str)> {
    ALL_MODES.iter().map(|mode| (mode.as_str(), policy(*mode).description)).collect()
}
