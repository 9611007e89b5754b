//! External tool seams: review submission, build verification, summaries
//!
//! Each tool the workflow shells out to is abstracted behind a one-method
//! trait with a production implementation in [`cli`] and in-memory fakes on
//! the test side. Spawn failures for a missing binary surface as
//! [`crate::error::Error::ToolNotFound`] so callers can degrade where the
//! workflow allows it.

mod cli;

pub use cli::{ClaudeCli, CodereviewCli, RepoTests, TrybotCli};

use crate::error::Result;
use crate::types::ToolOutput;
use async_trait::async_trait;

/// Code-review submission tool
#[async_trait]
pub trait ReviewTool: Send + Sync {
    /// Submit a commit for review; nonzero exits are returned as output,
    /// not errors, so callers can inspect "no new changes" responses
    async fn submit(&self, commit_ref: &str) -> Result<ToolOutput>;
}

/// Build-verification trigger tool
#[async_trait]
pub trait BuildVerifier: Send + Sync {
    /// Trigger build verification for a full commit hash
    async fn trigger(&self, commit_hash: &str) -> Result<ToolOutput>;
}

/// Generative-text summarizer (best effort, never required)
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Produce a summary from piped input; any error degrades to the
    /// heuristic extractor
    async fn summarize(&self, input: &str) -> Result<String>;
}

/// Repository pre-flight check (test suite)
#[async_trait]
pub trait PreflightCheck: Send + Sync {
    /// Run the checks; failures are reported as non-fatal warnings
    async fn run(&self) -> Result<ToolOutput>;
}
