//! Review submission and build verification

use crate::config::RepoConfig;
use crate::error::{Error, Result};
use crate::git::GitBackend;
use crate::report::Reporter;
use crate::tools::{BuildVerifier, ReviewTool};
use crate::types::Session;
use regex::Regex;
use std::sync::LazyLock;

/// Placeholder review change number assigned in dry-run mode
pub const DRY_RUN_REVIEW_ID: &str = "12345";

static REVIEW_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https://[^\s]+/(\d+)").expect("hardcoded pattern is valid"));

static CHANGE_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Change-Id: (I[a-f0-9]{40})").expect("hardcoded pattern is valid")
});

/// Pull the review URL and change number out of submission tool output
pub fn parse_review_url(output: &str) -> Option<(String, String)> {
    REVIEW_URL_RE.captures(output).map(|captures| {
        let url = captures.get(0).map_or("", |m| m.as_str()).to_string();
        let id = captures.get(1).map_or("", |m| m.as_str()).to_string();
        (url, id)
    })
}

/// Pull the Gerrit Change-Id trailer out of a commit message
pub fn parse_change_id(message: &str) -> Option<String> {
    CHANGE_ID_RE
        .captures(message)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Submit the proposal commit for code review
///
/// A "no new changes" response means the change is already under review; the
/// existing review is recovered from the commit's Change-Id trailer instead
/// of failing.
pub async fn submit_review(
    session: &mut Session,
    git: &dyn GitBackend,
    review: &dyn ReviewTool,
    config: &RepoConfig,
    reporter: &dyn Reporter,
) -> Result<()> {
    reporter.info("Submitting proposal for code review...");

    if session.dry_run {
        session.review_id = DRY_RUN_REVIEW_ID.to_string();
        session.review_url = config.review_url(DRY_RUN_REVIEW_ID);
        reporter.info(&format!(
            "[dry run] Would submit {} for review",
            session.commit_ref
        ));
        return Ok(());
    }

    let output = review.submit(&session.commit_ref).await?;
    let combined = output.combined();

    if !output.success {
        if combined.contains("no new changes") {
            reporter.info("Change already submitted for review, looking up existing review...");
            recover_existing_review(session, git, config, reporter).await?;
            return Ok(());
        }
        return Err(Error::Tool {
            tool: "git codereview mail".to_string(),
            stderr: combined.trim().to_string(),
        });
    }

    // The mail command prints the change URL on stdout or stderr depending
    // on the transport.
    let parsed = parse_review_url(&output.stdout).or_else(|| parse_review_url(&output.stderr));

    match parsed {
        Some((url, id)) => {
            session.review_url = url;
            session.review_id = id;
            reporter.success(&format!(
                "Submitted for review: {} (CL {})",
                session.review_url, session.review_id
            ));
        }
        None => {
            reporter.warn("Review submitted but no review URL found in output");
            recover_existing_review(session, git, config, reporter).await?;
        }
    }

    Ok(())
}

/// Recover the review URL for an already-submitted change
///
/// Best effort via the Change-Id trailer; leaves the session untouched with
/// a warning when no trailer is present.
async fn recover_existing_review(
    session: &mut Session,
    git: &dyn GitBackend,
    config: &RepoConfig,
    reporter: &dyn Reporter,
) -> Result<()> {
    let message = git.last_commit_message().await?;

    match parse_change_id(&message) {
        Some(change_id) => {
            session.review_url = format!("{}/q/{change_id}", config.review_base);
            session.review_id = change_id;
            reporter.success(&format!("Found existing review: {}", session.review_url));
        }
        None => {
            reporter.warn("Could not determine the review URL (no Change-Id trailer)");
            reporter.info("Check your open changes on the review site manually");
        }
    }

    Ok(())
}

/// Trigger build verification for the submitted change
///
/// Skipped with a warning when no review exists; a missing trigger binary
/// degrades to a warning with an install hint.
pub async fn trigger_build(
    session: &Session,
    git: &dyn GitBackend,
    build: &dyn BuildVerifier,
    reporter: &dyn Reporter,
) -> Result<()> {
    if session.dry_run {
        reporter.info("[dry run] Would trigger build verification");
        return Ok(());
    }

    if session.review_id.is_empty() {
        reporter.warn("No review submitted, skipping build verification");
        return Ok(());
    }

    reporter.info("Triggering build verification...");

    let commit_hash = git.resolve(&session.commit_ref).await?;

    match build.trigger(&commit_hash).await {
        Ok(output) if output.success => {
            reporter.success("Build verification triggered");
            Ok(())
        }
        Ok(output) => Err(Error::Tool {
            tool: "cueckoo".to_string(),
            stderr: output.combined().trim().to_string(),
        }),
        Err(Error::ToolNotFound(tool)) => {
            reporter.warn(&format!("{tool} is not installed, skipping build verification"));
            reporter.info("Install it with: go install github.com/cue-sh/tools/cmd/cueckoo@latest");
            Ok(())
        }
        Err(e) => Err(e),
    }
}
