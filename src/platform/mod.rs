//! Hosting-platform services for proposal discussions
//!
//! Provides a unified interface over the remote discussion API so the
//! workflow can run against an in-memory fake in tests.

mod detection;
mod github;

pub use detection::parse_repo_info;
pub use github::GitHubDiscussions;

use crate::error::Result;
use crate::types::{Discussion, DiscussionCategory};
use async_trait::async_trait;

/// Discussion operations consumed by the workflow
///
/// Exactly the remote surface the spec names: repository id lookup, category
/// listing, creation, fetch-by-number, and update.
#[async_trait]
pub trait DiscussionHost: Send + Sync {
    /// Opaque node id of the repository (needed by the create mutation)
    async fn repository_id(&self) -> Result<String>;

    /// Available discussion categories
    async fn discussion_categories(&self) -> Result<Vec<DiscussionCategory>>;

    /// Create a discussion and return the created record
    async fn create_discussion(
        &self,
        repository_id: &str,
        category_id: &str,
        title: &str,
        body: &str,
    ) -> Result<Discussion>;

    /// Fetch a discussion by number; `None` when it does not exist
    async fn fetch_discussion(&self, number: u64) -> Result<Option<Discussion>>;

    /// Replace a discussion's body
    async fn update_discussion(&self, discussion_id: &str, body: &str) -> Result<()>;
}
