//! Commit inspection: find and classify the proposal document in a commit

use crate::config::{DRAFT_PREFIX, PROPOSAL_DIR, PROPOSAL_EXT};
use crate::error::{Error, Result};
use crate::git::{FileChange, GitBackend};
use crate::report::Reporter;
use crate::types::{Lifecycle, Session};
use regex::Regex;
use std::sync::LazyLock;

static DRAFT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^xxxx-.*\.md$").expect("hardcoded pattern is valid"));
static NUMBERED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)-.*\.md$").expect("hardcoded pattern is valid"));

/// Proposal candidates found in a commit's change set
#[derive(Debug, Clone, Default)]
pub struct ProposalScan {
    /// Candidate proposal paths (rename targets count once)
    pub candidates: Vec<String>,
    /// A detected proposal rename, for diagnostics
    pub rename: Option<(String, String)>,
}

fn is_proposal_path(path: &str) -> bool {
    path.starts_with(PROPOSAL_DIR) && path.ends_with(PROPOSAL_EXT)
}

/// Scan a commit's changes for proposal documents
///
/// Renames where both endpoints are proposal paths contribute only the
/// target as a candidate; the source is kept for diagnostics.
pub fn scan_for_proposals(changes: &[FileChange]) -> ProposalScan {
    let mut scan = ProposalScan::default();

    for change in changes {
        match change {
            FileChange::Added(path) | FileChange::Modified(path) => {
                if is_proposal_path(path) {
                    scan.candidates.push(path.clone());
                }
            }
            FileChange::Renamed { from, to } => {
                if is_proposal_path(from) && is_proposal_path(to) {
                    scan.candidates.push(to.clone());
                    scan.rename = Some((from.clone(), to.clone()));
                }
            }
            FileChange::Deleted(_) => {}
        }
    }

    scan
}

/// Classify a proposal basename
///
/// Returns the lifecycle stage and, for numbered proposals, the discussion
/// number embedded in the filename.
pub fn classify(basename: &str) -> Result<(Lifecycle, Option<String>)> {
    if DRAFT_RE.is_match(basename) {
        return Ok((Lifecycle::Draft, None));
    }

    if let Some(captures) = NUMBERED_RE.captures(basename) {
        let number = captures
            .get(1)
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| Error::Internal("numbered pattern without capture".to_string()))?;
        return Ok((Lifecycle::Numbered, Some(number)));
    }

    Err(Error::InvalidNamingConvention(basename.to_string()))
}

/// Inspect the session's commit and classify its proposal document
///
/// Populates `commit_hash`, `proposal_path`, `basename`, `lifecycle`, and
/// (for numbered proposals) `discussion_id`. Read-only against git.
pub async fn inspect_commit(
    session: &mut Session,
    git: &dyn GitBackend,
    reporter: &dyn Reporter,
) -> Result<()> {
    reporter.info(&format!(
        "Finding proposal files in commit {}...",
        session.commit_ref
    ));

    session.commit_hash = git
        .resolve(&session.commit_ref)
        .await
        .map_err(|_| Error::InvalidReference(session.commit_ref.clone()))?;

    let changes = git.changed_files(&session.commit_ref).await?;
    let scan = scan_for_proposals(&changes);

    if let Some((from, to)) = &scan.rename {
        reporter.info(&format!("Detected proposal file rename: {from} -> {to}"));
    }

    if scan.candidates.is_empty() {
        return Err(Error::NoProposalFound(session.commit_ref.clone()));
    }

    if scan.candidates.len() > 1 {
        reporter.error(&format!(
            "Multiple proposal files found in commit {}:",
            session.commit_ref
        ));
        for candidate in &scan.candidates {
            reporter.error(&format!("  {candidate}"));
        }
        if let Some((from, to)) = &scan.rename {
            reporter.info(&format!("Note: detected rename from {from} to {to}"));
        }
        return Err(Error::MultipleProposalsFound(session.commit_ref.clone()));
    }

    session.proposal_path = scan.candidates[0].clone();
    session.basename = session
        .proposal_path
        .rsplit('/')
        .next()
        .unwrap_or(&session.proposal_path)
        .to_string();
    reporter.info(&format!("Found proposal file: {}", session.proposal_path));

    let (lifecycle, number) = classify(&session.basename)?;
    session.lifecycle = Some(lifecycle);

    match lifecycle {
        Lifecycle::Draft => {
            reporter.info(&format!("Detected draft proposal: {}", session.basename));
        }
        Lifecycle::Numbered => {
            session.discussion_id =
                number.ok_or_else(|| Error::Internal("numbered without id".to_string()))?;
            reporter.info(&format!(
                "Detected numbered proposal: {} (discussion #{})",
                session.basename, session.discussion_id
            ));
        }
    }

    Ok(())
}
