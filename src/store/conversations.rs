//! SQLite-backed conversation persistence.
//!
//! One row per conversation id, the whole state serialized as JSON. Saves are
//! last-write-wins: two processes updating the same conversation can race
//! (single-user assumption; see DESIGN.md).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::memory::ConversationState;

pub struct ConversationStore {
    conn: Connection,
}

impl ConversationStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed creating {}", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Failed opening conversation db at {}", path.display()))?;
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS conversations (
                conversation_id TEXT PRIMARY KEY,
                state_json TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            ",
        )?;
        Ok(ConversationStore { conn })
    }

    pub fn load(&self, conversation_id: &str) -> Result<Option<ConversationState>> {
        let row: Option<String> = self
            .conn
            .query_row(
                "SELECT state_json FROM conversations WHERE conversation_id = ?1",
                params![conversation_id],
                |row| row.get(0),
            )
            .optional()?;

        match row {
            None => Ok(None),
            Some(json) => {
                let state = serde_json::from_str(&json)
                    .with_context(|| format!("Corrupt conversation state for {conversation_id}"))?;
                Ok(Some(state))
            }
        }
    }

    pub fn save(&self, conversation_id: &str, state: &ConversationState) -> Result<()> {
        let json = serde_json::to_string(state).context("Failed serializing conversation state")?;
        self.conn.execute(
            "
            INSERT INTO conversations (conversation_id, state_json, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(conversation_id)
            DO UPDATE SET
                state_json = excluded.state_json,
                updated_at = excluded.updated_at
            ",
            params![conversation_id, json, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Role;
    use tempfile::TempDir;

    #[test]
    fn save_load_round_trip() {
        let tmp = TempDir::new().expect("tmp");
        let store = ConversationStore::open(&tmp.path().join("repo/memory.sqlite")).expect("open");

        let mut state = ConversationState::new();
        state.summary = Some("covered the loader".to_string());
        state.append_turn(Role::User, "what next?");
        store.save("conv-1", &state).expect("save");

        let loaded = store.load("conv-1").expect("load").expect("present");
        assert_eq!(loaded.summary.as_deref(), Some("covered the loader"));
        assert_eq!(loaded.recent_turns.len(), 1);
    }

    #[test]
    fn unknown_conversation_loads_none() {
        let tmp = TempDir::new().expect("tmp");
        let store = ConversationStore::open(&tmp.path().join("memory.sqlite")).expect("open");
        assert!(store.load("missing").expect("load").is_none());
    }

    #[test]
    fn save_overwrites_existing_state() {
        let tmp = TempDir::new().expect("tmp");
        let store = ConversationStore::open(&tmp.path().join("memory.sqlite")).expect("open");

        let mut state = ConversationState::new();
        state.append_turn(Role::User, "first");
        store.save("conv-1", &state).expect("save");

        state.append_turn(Role::Assistant, "second");
        store.save("conv-1", &state).expect("save again");

        let loaded = store.load("conv-1").expect("load").expect("present");
        assert_eq!(loaded.recent_turns.len(), 2);
    }
}
