//! Core types for proposal-publish

use serde::{Deserialize, Serialize};

/// Lifecycle stage of a proposal, determined once from its filename
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifecycle {
    /// Filename uses the `xxxx-` placeholder prefix; no discussion exists yet
    Draft,
    /// Filename carries a concrete discussion number prefix
    Numbered,
}

/// Mutable state for one publication run
///
/// Created fresh per invocation and populated monotonically by the workflow
/// stages; never persisted.
#[derive(Debug, Clone)]
pub struct Session {
    /// User-supplied commit reference (symbolic ref or hash)
    pub commit_ref: String,
    /// Resolved full commit hash (refreshed after amends)
    pub commit_hash: String,
    /// When true, no mutation reaches the repository or remote services
    pub dry_run: bool,
    /// Use the generative-text tool for the discussion summary
    pub use_ai: bool,
    /// Repository-relative path of the proposal document
    pub proposal_path: String,
    /// Basename of the proposal document
    pub basename: String,
    /// Classification; `None` until the inspector has run
    pub lifecycle: Option<Lifecycle>,
    /// Discussion number as a decimal string; empty until assigned
    pub discussion_id: String,
    /// Discussion web URL; empty until assigned
    pub discussion_url: String,
    /// Proposal path after renaming (equals `proposal_path` for numbered)
    pub renamed_path: String,
    /// Review change number; empty until submitted
    pub review_id: String,
    /// Review web URL; empty until submitted
    pub review_url: String,
}

impl Session {
    /// Create a session for the given commit reference
    pub fn new(commit_ref: &str, dry_run: bool, use_ai: bool) -> Self {
        Self {
            commit_ref: commit_ref.to_string(),
            commit_hash: String::new(),
            dry_run,
            use_ai,
            proposal_path: String::new(),
            basename: String::new(),
            lifecycle: None,
            discussion_id: String::new(),
            discussion_url: String::new(),
            renamed_path: String::new(),
            review_id: String::new(),
            review_url: String::new(),
        }
    }

    /// Whether the proposal was classified as a draft
    pub fn is_draft(&self) -> bool {
        self.lifecycle == Some(Lifecycle::Draft)
    }

    /// Whether the proposal was classified as numbered
    pub fn is_numbered(&self) -> bool {
        self.lifecycle == Some(Lifecycle::Numbered)
    }
}

/// A hosting-platform discussion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Discussion {
    /// Opaque node id used by update mutations
    pub id: String,
    /// Discussion number
    pub number: u64,
    /// Web URL
    pub url: String,
    /// Body text
    pub body: String,
}

/// A discussion category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscussionCategory {
    /// Opaque node id
    pub id: String,
    /// Category display name
    pub name: String,
}

/// Captured output of an external tool invocation
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Whether the tool exited zero
    pub success: bool,
    /// Captured stdout
    pub stdout: String,
    /// Captured stderr
    pub stderr: String,
}

impl ToolOutput {
    /// Stdout and stderr joined, for pattern matching across both streams
    pub fn combined(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}
