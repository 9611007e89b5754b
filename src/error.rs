//! Error types for proposal-publish

/// Result alias using the crate error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the publication workflow
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Commit reference could not be resolved
    #[error("invalid commit reference: {0}")]
    InvalidReference(String),

    /// The commit touches no proposal document
    #[error("no proposal files (designs/*.md) found in commit {0}")]
    NoProposalFound(String),

    /// The commit touches more than one proposal document
    #[error("multiple proposal files found in commit {0}: each proposal should be in its own commit")]
    MultipleProposalsFound(String),

    /// Proposal filename matches neither the draft nor the numbered pattern
    #[error(
        "proposal file must follow naming convention: xxxx-*.md (draft) or NNNN-*.md (numbered), got: {0}"
    )]
    InvalidNamingConvention(String),

    /// Proposal document has no leading `# Title` heading
    #[error("could not extract title from {0} (no '# Title' heading found)")]
    MissingTitle(String),

    /// Numbered proposal points at a discussion that does not exist
    #[error("discussion #{0} not found")]
    DiscussionNotFound(String),

    /// Numbered proposal points at a discussion that belongs to something else
    #[error("discussion #{0} does not appear to belong to this proposal")]
    DiscussionMismatch(String),

    /// The repository has no discussion categories to create into
    #[error("no discussion categories found")]
    NoDiscussionCategories,

    /// A descendant commit could not be replayed during a history rewrite
    #[error("failed to cherry-pick {commit}: {message}")]
    CherryPick {
        /// Abbreviated hash of the failing commit
        commit: String,
        /// Stderr of the failing cherry-pick
        message: String,
    },

    /// A git command exited nonzero
    #[error("git {command} failed: {stderr}")]
    Git {
        /// The git subcommand and arguments
        command: String,
        /// Captured stderr
        stderr: String,
    },

    /// GitHub API transport failure
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// The GraphQL response carried an errors array
    #[error("GraphQL errors: {0}")]
    GraphQl(String),

    /// No usable authentication token
    #[error("authentication error: {0}")]
    Auth(String),

    /// An external tool exited nonzero
    #[error("{tool} failed: {stderr}")]
    Tool {
        /// Tool name
        tool: String,
        /// Captured stderr
        stderr: String,
    },

    /// An external tool is not installed
    #[error("{0} is not installed")]
    ToolNotFound(String),

    /// Output from git or a tool could not be parsed
    #[error("parse error: {0}")]
    Parse(String),

    /// Invariant violation that should not be reachable
    #[error("internal error: {0}")]
    Internal(String),

    /// Filesystem or subprocess I/O failure
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
