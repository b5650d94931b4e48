//! Workspace layout: one data root, repo-scoped artifact directories, and
//! explicit active-repository tracking.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

const ACTIVE_REPO_FILE: &str = "LAST_ACTIVE_REPO";

/// Handle to the assistant's data directory.
#[derive(Debug, Clone)]
pub struct Workspace {
    data_root: PathBuf,
}

impl Workspace {
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Workspace { data_root: data_root.into() }
    }

    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    pub fn set_active_repo(&self, repo_name: &str) -> Result<()> {
        fs::create_dir_all(&self.data_root).with_context(|| {
            format!("Failed creating data directory {}", self.data_root.display())
        })?;
        let marker = self.data_root.join(ACTIVE_REPO_FILE);
        fs::write(&marker, repo_name)
            .with_context(|| format!("Failed writing {}", marker.display()))?;
        Ok(())
    }

    pub fn active_repo(&self) -> Result<String> {
        let marker = self.data_root.join(ACTIVE_REPO_FILE);
        if !marker.exists() {
            anyhow::bail!("No repository indexed yet. Run `repo-explain index <PATH>` first.");
        }
        let name = fs::read_to_string(&marker)
            .with_context(|| format!("Failed reading {}", marker.display()))?;
        Ok(name.trim().to_string())
    }

    pub fn repo_dir(&self, repo_name: &str) -> PathBuf {
        self.data_root.join(repo_name)
    }

    pub fn chunks_path(&self, repo_name: &str) -> PathBuf {
        self.repo_dir(repo_name).join("chunks.json")
    }

    pub fn embeddings_path(&self, repo_name: &str) -> PathBuf {
        self.repo_dir(repo_name).join("embeddings.json")
    }

    pub fn vector_store_path(&self, repo_name: &str) -> PathBuf {
        self.repo_dir(repo_name).join("store.json")
    }

    pub fn memory_db_path(&self, repo_name: &str) -> PathBuf {
        self.repo_dir(repo_name).join("memory.sqlite")
    }

    pub fn preview_path(&self, repo_name: &str) -> PathBuf {
        self.repo_dir(repo_name).join("chunks.preview.yaml")
    }
}

/// Repository name derived from its root directory.
pub fn repo_name_from_path(repo_root: &Path) -> String {
    repo_root
        .canonicalize()
        .unwrap_or_else(|_| repo_root.to_path_buf())
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "repo".to_string())
}
