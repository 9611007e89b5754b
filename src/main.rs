//! publish - design proposal publication workflow
//!
//! CLI binary that walks a proposal commit through discussion creation,
//! renaming, link synchronization, review submission, and build
//! verification.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "publish")]
#[command(about = "Publish a design proposal: discussion, rename, review, trybots")]
#[command(version)]
struct Cli {
    /// Path to the proposal repository (defaults to current directory)
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Show what would be done without making changes
    #[arg(long)]
    dry_run: bool,

    /// Generate the discussion summary with the claude CLI
    #[arg(long)]
    use_ai: bool,

    /// The commit containing the proposal document
    #[arg(default_value = "HEAD")]
    commit_ref: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = cli.path.unwrap_or_else(|| PathBuf::from("."));

    cli::run_publish(&path, &cli.commit_ref, cli.dry_run, cli.use_ai).await?;

    Ok(())
}
