use anyhow::Result;

fn main() -> Result<()> {
    repo_explain::cli::run()
}
