//! The publication workflow pipeline
//!
//! One run moves a single proposal commit through inspection, discussion
//! creation or verification, history rewriting, document synchronization,
//! content publishing, review submission, and build verification, in that
//! order. All external effects go through the trait seams collected in
//! [`Collaborators`], so the whole pipeline runs against fakes in tests and
//! stays side-effect free under `--dry-run`.

pub mod content;
pub mod discussion;
pub mod document;
pub mod inspect;
pub mod review;
pub mod rewrite;

use crate::config::RepoConfig;
use crate::error::{Error, Result};
use crate::git::GitBackend;
use crate::platform::DiscussionHost;
use crate::report::Reporter;
use crate::tools::{BuildVerifier, PreflightCheck, ReviewTool, Summarizer};
use crate::types::{Lifecycle, Session};

/// Everything the pipeline touches outside its own state
pub struct Collaborators<'a> {
    /// Version-control access
    pub git: &'a dyn GitBackend,
    /// Discussion hosting platform
    pub host: &'a dyn DiscussionHost,
    /// Code-review submission tool
    pub review: &'a dyn ReviewTool,
    /// Build-verification trigger
    pub build: &'a dyn BuildVerifier,
    /// Summary generator for `--use-ai`
    pub summarizer: &'a dyn Summarizer,
    /// Repository test suite
    pub preflight: &'a dyn PreflightCheck,
    /// Progress reporting sink
    pub reporter: &'a dyn Reporter,
    /// Repository coordinates
    pub config: &'a RepoConfig,
}

/// Run the full publication pipeline for one commit
pub async fn run(session: &mut Session, c: &Collaborators<'_>) -> Result<()> {
    inspect::inspect_commit(session, c.git, c.reporter).await?;

    run_preflight(c).await;

    match session.lifecycle {
        Some(Lifecycle::Draft) => {
            discussion::create_discussion(session, c.git, c.host, c.config, c.reporter).await?;
        }
        Some(Lifecycle::Numbered) => {
            discussion::verify_discussion(session, c.host, c.reporter).await?;
        }
        None => {
            return Err(Error::Internal("commit inspected without lifecycle".to_string()));
        }
    }

    rewrite::rewrite_history(session, c.git, c.reporter).await?;
    document::update_document_references(session, c.git, c.config, c.reporter).await?;
    content::publish_content(session, c.git, c.host, c.summarizer, c.config, c.reporter).await?;
    review::submit_review(session, c.git, c.review, c.config, c.reporter).await?;
    review::trigger_build(session, c.git, c.build, c.reporter).await?;

    Ok(())
}

/// Run the repository test suite; advisory only, every outcome is non-fatal
async fn run_preflight(c: &Collaborators<'_>) {
    c.reporter.info("Running repository tests...");

    match c.preflight.run().await {
        Ok(output) if output.success => {
            c.reporter.success("Repository tests passed");
        }
        Ok(output) => {
            c.reporter.warn("Repository tests failed:");
            c.reporter.warn(output.combined().trim());
            c.reporter.warn("Continuing anyway; fix the tests before merging");
        }
        Err(Error::ToolNotFound(tool)) => {
            c.reporter
                .warn(&format!("{tool} is not installed, skipping repository tests"));
        }
        Err(e) => {
            c.reporter
                .warn(&format!("Could not run repository tests: {e}"));
        }
    }
}
