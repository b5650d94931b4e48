//! Integration tests for CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("repo-explain"))
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, content).expect("write");
}

/// A small Python repository with an inheritance chain.
fn fixture_repo(root: &Path) {
    write(root, "pkg/__init__.py", "");
    write(
        root,
        "pkg/models.py",
        "class Base:\n    \"\"\"Common behavior.\"\"\"\n\n    def run(self):\n        pass\n\n\nclass Derived(Base):\n    def run(self):\n        return 1\n",
    );
    write(root, "pkg/util.py", "def helper(x):\n    \"\"\"Do a thing.\"\"\"\n    return x\n");
}

#[test]
fn test_cli_version() {
    cli().arg("--version").assert().success().stdout(predicate::str::contains("repo-explain"));
}

#[test]
fn test_cli_help_lists_subcommands() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("index"))
        .stdout(predicate::str::contains("embed"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("preview"))
        .stdout(predicate::str::contains("info"));
}

#[test]
fn test_index_writes_chunks_and_sets_active_repo() {
    let work = TempDir::new().expect("work dir");
    let repo = work.path().join("myrepo");
    fixture_repo(&repo);
    let data = work.path().join("data");

    cli()
        .current_dir(work.path())
        .env("REPO_EXPLAIN_DATA_DIR", &data)
        .args(["index", repo.to_str().expect("utf8")])
        .assert()
        .success()
        .stdout(predicate::str::contains("Indexed"))
        .stdout(predicate::str::contains("Active repository: myrepo"));

    let chunks_path = data.join("myrepo").join("chunks.json");
    assert!(chunks_path.exists());
    let chunks = fs::read_to_string(&chunks_path).expect("read chunks");
    assert!(chunks.contains("pkg/models.py::Derived::overview"));
    assert!(chunks.contains("\"parent_symbols\""));
    assert_eq!(fs::read_to_string(data.join("LAST_ACTIVE_REPO")).expect("marker"), "myrepo");
}

#[test]
fn test_index_rejects_missing_directory() {
    let work = TempDir::new().expect("work dir");
    cli()
        .current_dir(work.path())
        .args(["index", "does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a directory"));
}

#[test]
fn test_search_without_index_reports_missing_repo() {
    let work = TempDir::new().expect("work dir");
    cli()
        .current_dir(work.path())
        .env("REPO_EXPLAIN_DATA_DIR", work.path().join("data"))
        .args(["search", "anything"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No repository indexed yet"));
}

#[test]
fn test_search_without_embeddings_reports_data_unavailable() {
    let work = TempDir::new().expect("work dir");
    let repo = work.path().join("myrepo");
    fixture_repo(&repo);
    let data = work.path().join("data");

    cli()
        .current_dir(work.path())
        .env("REPO_EXPLAIN_DATA_DIR", &data)
        .args(["index", repo.to_str().expect("utf8")])
        .assert()
        .success();

    cli()
        .current_dir(work.path())
        .env("REPO_EXPLAIN_DATA_DIR", &data)
        .args(["search", "anything"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("data unavailable"));
}

#[test]
fn test_embed_dry_run_reports_filter_without_artifacts() {
    let work = TempDir::new().expect("work dir");
    let repo = work.path().join("myrepo");
    fixture_repo(&repo);
    let data = work.path().join("data");

    cli()
        .current_dir(work.path())
        .env("REPO_EXPLAIN_DATA_DIR", &data)
        .args(["index", repo.to_str().expect("utf8")])
        .assert()
        .success();

    cli()
        .current_dir(work.path())
        .env("REPO_EXPLAIN_DATA_DIR", &data)
        .args(["embed", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("EMBEDDING FILTER RESULT"))
        .stdout(predicate::str::contains("Dry run - no embedding performed."));

    assert!(!data.join("myrepo").join("embeddings.json").exists());
    assert!(!data.join("myrepo").join("store.json").exists());
}

#[test]
fn test_preview_renders_yaml() {
    let work = TempDir::new().expect("work dir");
    let repo = work.path().join("myrepo");
    fixture_repo(&repo);
    let data = work.path().join("data");

    cli()
        .current_dir(work.path())
        .env("REPO_EXPLAIN_DATA_DIR", &data)
        .args(["index", repo.to_str().expect("utf8")])
        .assert()
        .success();

    cli()
        .current_dir(work.path())
        .env("REPO_EXPLAIN_DATA_DIR", &data)
        .args(["preview"])
        .assert()
        .success()
        .stdout(predicate::str::contains("YAML preview written to"));

    let preview = fs::read_to_string(data.join("myrepo").join("chunks.preview.yaml"))
        .expect("preview file");
    assert!(preview.contains("pkg/models.py::Base"));
}

#[test]
fn test_ask_rejects_unknown_mode() {
    let work = TempDir::new().expect("work dir");
    cli()
        .current_dir(work.path())
        .args(["ask", "what is this?", "--mode", "telepathy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_info_lists_modes_without_a_repo() {
    let work = TempDir::new().expect("work dir");
    cli()
        .current_dir(work.path())
        .env("REPO_EXPLAIN_DATA_DIR", work.path().join("data"))
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("Active repository: none"))
        .stdout(predicate::str::contains("exploration"))
        .stdout(predicate::str::contains("architecture"));
}

#[test]
fn test_info_reports_chunk_counts_after_index() {
    let work = TempDir::new().expect("work dir");
    let repo = work.path().join("myrepo");
    fixture_repo(&repo);
    let data = work.path().join("data");

    cli()
        .current_dir(work.path())
        .env("REPO_EXPLAIN_DATA_DIR", &data)
        .args(["index", repo.to_str().expect("utf8")])
        .assert()
        .success();

    cli()
        .current_dir(work.path())
        .env("REPO_EXPLAIN_DATA_DIR", &data)
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("Active repository: myrepo"))
        .stdout(predicate::str::contains("project map: yes"))
        .stdout(predicate::str::contains("Vector store: not built"));
}
