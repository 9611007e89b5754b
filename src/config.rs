//! Repository configuration for the publication workflow

use crate::platform::parse_repo_info;

/// Directory prefix under which proposal documents live
pub const PROPOSAL_DIR: &str = "designs/";

/// Extension proposal documents must carry
pub const PROPOSAL_EXT: &str = ".md";

/// Placeholder filename prefix for draft proposals
pub const DRAFT_PREFIX: &str = "xxxx-";

/// Repository coordinates and service endpoints for one run
#[derive(Debug, Clone)]
pub struct RepoConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Branch proposal blob links point at
    pub default_branch: String,
    /// Base URL of the code-review service
    pub review_base: String,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            owner: "cue-lang".to_string(),
            repo: "proposal".to_string(),
            default_branch: "main".to_string(),
            review_base: "https://review.gerrithub.io".to_string(),
        }
    }
}

impl RepoConfig {
    /// Derive owner/repo from a git remote URL, keeping the other defaults
    pub fn from_remote(url: &str) -> Option<Self> {
        let (owner, repo) = parse_repo_info(url).ok()?;
        Some(Self {
            owner,
            repo,
            ..Self::default()
        })
    }

    /// Web URL of a discussion by number
    pub fn discussion_url(&self, number: &str) -> String {
        format!(
            "https://github.com/{}/{}/discussions/{number}",
            self.owner, self.repo
        )
    }

    /// Web URL of a file blob on the default branch
    pub fn blob_url(&self, path: &str) -> String {
        format!(
            "https://github.com/{}/{}/blob/{}/{path}",
            self.owner, self.repo, self.default_branch
        )
    }

    /// Web URL of a review change by number
    pub fn review_url(&self, number: &str) -> String {
        format!(
            "{}/c/{}/{}/+/{number}",
            self.review_base, self.owner, self.repo
        )
    }
}
