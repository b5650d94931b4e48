//! Repository indexing: filesystem walk + structural extraction.
//!
//! Produces the full chunk list for a repository: one project-map chunk, then
//! per-file module/class/method/function chunks. Files parse in parallel and
//! the output is path-ordered, so indexing the same tree twice yields the
//! same artifact.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use rayon::prelude::*;

use crate::domain::{ChunkKind, CodeChunk, PROJECT_CHUNK_ID};
use crate::utils::read_source_file;

pub mod overview;
pub mod python;

const MAX_PACKAGE_DEPTH: usize = 4;

const IGNORE_DIRS: &[&str] =
    &["__pycache__", ".git", ".mypy_cache", ".pytest_cache", ".venv", "tests"];

#[derive(Debug, Clone, Default)]
pub struct IndexOptions {
    pub exclude_globs: Vec<String>,
    pub no_gitignore: bool,
}

/// Index a repository into structural chunks.
pub fn index_repository(repo_root: &Path, options: &IndexOptions) -> Result<Vec<CodeChunk>> {
    let exclude = build_exclude_globset(&options.exclude_globs)?;

    let mut files: Vec<PathBuf> = Vec::new();
    let respect_gitignore = !options.no_gitignore;
    let walker = WalkBuilder::new(repo_root)
        .git_ignore(respect_gitignore)
        .git_global(respect_gitignore)
        .git_exclude(respect_gitignore)
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!("skipping unreadable entry: {err}");
                continue;
            }
        };
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("py") {
            continue;
        }
        if exclude.is_match(relative_path(repo_root, path)) {
            continue;
        }
        files.push(path.to_path_buf());
    }

    files.sort();

    let per_file: Vec<Vec<CodeChunk>> = files
        .par_iter()
        .map(|path| {
            let rel = relative_path(repo_root, path);
            match read_source_file(path) {
                Ok(source) => python::chunk_python_source(&rel, &source),
                Err(err) => {
                    tracing::warn!("skipping {}: {err}", path.display());
                    Vec::new()
                }
            }
        })
        .collect();

    let mut chunks = vec![chunk_project_overview(repo_root)];
    chunks.extend(per_file.into_iter().flatten());

    tracing::debug!(files = files.len(), chunks = chunks.len(), "indexed repository");
    Ok(chunks)
}

/// The single project-map chunk describing WHERE things live.
pub fn chunk_project_overview(repo_root: &Path) -> CodeChunk {
    let name = repo_root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| repo_root.display().to_string());

    CodeChunk {
        id: PROJECT_CHUNK_ID.to_string(),
        file: repo_root.display().to_string(),
        kind: ChunkKind::Project,
        symbol: name.clone(),
        text: build_project_overview(repo_root, &name),
        parent_symbols: Vec::new(),
    }
}

fn build_project_overview(repo_root: &Path, name: &str) -> String {
    let mut lines: Vec<String> = vec![
        format!("Project: {name}"),
        format!("Root: {}", repo_root.display()),
        String::new(),
        "Package structure:".to_string(),
        String::new(),
    ];

    append_package_tree(repo_root, 0, &mut lines);
    lines.join("\n").trim().to_string()
}

/// Indented tree of Python packages (directories holding `__init__.py`).
fn append_package_tree(base: &Path, depth: usize, lines: &mut Vec<String>) {
    if depth > MAX_PACKAGE_DEPTH {
        return;
    }

    let mut entries: Vec<PathBuf> = match fs::read_dir(base) {
        Ok(read) => read.filter_map(|e| e.ok()).map(|e| e.path()).collect(),
        Err(_) => return,
    };
    entries.sort();

    for entry in entries {
        if !entry.is_dir() {
            continue;
        }
        let Some(dir_name) = entry.file_name().and_then(|n| n.to_str()) else { continue };
        if IGNORE_DIRS.contains(&dir_name) {
            continue;
        }
        if !entry.join("__init__.py").exists() {
            continue;
        }
        lines.push(format!("{}- {dir_name}", "  ".repeat(depth)));
        append_package_tree(&entry, depth + 1, lines);
    }
}

fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace(std::path::MAIN_SEPARATOR, "/")
}

fn build_exclude_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob =
            Glob::new(pattern).with_context(|| format!("Invalid exclude glob: {pattern}"))?;
        builder.add(glob);
    }
    builder.build().context("Failed building exclude globset")
}
