//! GitHub discussion service over the GraphQL API
//!
//! The REST API does not expose discussion categories or mutations, so every
//! call goes through the GraphQL endpoint. Responses are deserialized into
//! typed per-call structs; `serde_json::Value` appears only at the transport
//! boundary.

use crate::auth::get_github_auth;
use crate::error::{Error, Result};
use crate::platform::DiscussionHost;
use crate::types::{Discussion, DiscussionCategory};
use async_trait::async_trait;
use octocrab::Octocrab;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;

const CATEGORIES_QUERY: &str = "\
query($owner: String!, $name: String!) {
  repository(owner: $owner, name: $name) {
    discussionCategories(first: 25) {
      nodes { id name }
    }
  }
}";

const REPOSITORY_ID_QUERY: &str = "\
query($owner: String!, $name: String!) {
  repository(owner: $owner, name: $name) { id }
}";

const CREATE_DISCUSSION_MUTATION: &str = "\
mutation($repositoryId: ID!, $categoryId: ID!, $title: String!, $body: String!) {
  createDiscussion(input: {
    repositoryId: $repositoryId
    categoryId: $categoryId
    title: $title
    body: $body
  }) {
    discussion { id number url body }
  }
}";

const FETCH_DISCUSSION_QUERY: &str = "\
query($owner: String!, $name: String!, $number: Int!) {
  repository(owner: $owner, name: $name) {
    discussion(number: $number) { id number url body }
  }
}";

const UPDATE_DISCUSSION_MUTATION: &str = "\
mutation($discussionId: ID!, $body: String!) {
  updateDiscussion(input: {discussionId: $discussionId, body: $body}) {
    discussion { url }
  }
}";

/// GitHub discussion host using octocrab
///
/// The client is constructed lazily on the first remote call, so sessions
/// that never reach the network (dry runs of draft proposals) need no
/// credentials.
pub struct GitHubDiscussions {
    owner: String,
    repo: String,
    client: OnceCell<Octocrab>,
}

impl GitHubDiscussions {
    /// Create a host for the given repository
    pub fn new(owner: String, repo: String) -> Self {
        Self {
            owner,
            repo,
            client: OnceCell::new(),
        }
    }

    async fn client(&self) -> Result<&Octocrab> {
        self.client
            .get_or_try_init(|| async {
                let auth = get_github_auth().await?;
                tracing::debug!(source = ?auth.source, "authenticated with GitHub");
                Octocrab::builder()
                    .personal_token(auth.token)
                    .build()
                    .map_err(|e| Error::GitHubApi(e.to_string()))
            })
            .await
    }

    /// Issue a GraphQL call and deserialize the `data` payload
    async fn call<T: DeserializeOwned>(&self, payload: serde_json::Value) -> Result<T> {
        let client = self.client().await?;
        let raw: serde_json::Value = client
            .graphql(&payload)
            .await
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        if let Some(errors) = raw
            .get("errors")
            .and_then(serde_json::Value::as_array)
            .filter(|errors| !errors.is_empty())
        {
            return Err(Error::GraphQl(serde_json::to_string(errors)?));
        }

        let data = raw
            .get("data")
            .cloned()
            .ok_or_else(|| Error::Parse("GraphQL response has no data field".to_string()))?;

        Ok(serde_json::from_value(data)?)
    }
}

// Per-call response shapes. GraphQL returns `null` rather than omitting
// fields, so nested objects are Options.

#[derive(Deserialize)]
struct RepositoryIdData {
    repository: Option<RepositoryIdNode>,
}

#[derive(Deserialize)]
struct RepositoryIdNode {
    id: String,
}

#[derive(Deserialize)]
struct CategoriesData {
    repository: Option<CategoriesRepository>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategoriesRepository {
    discussion_categories: CategoryNodes,
}

#[derive(Deserialize)]
struct CategoryNodes {
    nodes: Vec<DiscussionCategory>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateDiscussionData {
    create_discussion: CreatedDiscussion,
}

#[derive(Deserialize)]
struct CreatedDiscussion {
    discussion: Discussion,
}

#[derive(Deserialize)]
struct FetchDiscussionData {
    repository: Option<FetchDiscussionRepository>,
}

#[derive(Deserialize)]
struct FetchDiscussionRepository {
    discussion: Option<Discussion>,
}

#[async_trait]
impl DiscussionHost for GitHubDiscussions {
    async fn repository_id(&self) -> Result<String> {
        let data: RepositoryIdData = self
            .call(serde_json::json!({
                "query": REPOSITORY_ID_QUERY,
                "variables": { "owner": self.owner, "name": self.repo },
            }))
            .await?;

        data.repository
            .map(|r| r.id)
            .ok_or_else(|| Error::GitHubApi(format!("repository {}/{} not found", self.owner, self.repo)))
    }

    async fn discussion_categories(&self) -> Result<Vec<DiscussionCategory>> {
        let data: CategoriesData = self
            .call(serde_json::json!({
                "query": CATEGORIES_QUERY,
                "variables": { "owner": self.owner, "name": self.repo },
            }))
            .await?;

        Ok(data
            .repository
            .map(|r| r.discussion_categories.nodes)
            .unwrap_or_default())
    }

    async fn create_discussion(
        &self,
        repository_id: &str,
        category_id: &str,
        title: &str,
        body: &str,
    ) -> Result<Discussion> {
        let data: CreateDiscussionData = self
            .call(serde_json::json!({
                "query": CREATE_DISCUSSION_MUTATION,
                "variables": {
                    "repositoryId": repository_id,
                    "categoryId": category_id,
                    "title": title,
                    "body": body,
                },
            }))
            .await?;

        Ok(data.create_discussion.discussion)
    }

    async fn fetch_discussion(&self, number: u64) -> Result<Option<Discussion>> {
        let data: FetchDiscussionData = self
            .call(serde_json::json!({
                "query": FETCH_DISCUSSION_QUERY,
                "variables": { "owner": self.owner, "name": self.repo, "number": number },
            }))
            .await?;

        Ok(data.repository.and_then(|r| r.discussion))
    }

    async fn update_discussion(&self, discussion_id: &str, body: &str) -> Result<()> {
        let _: serde_json::Value = self
            .call(serde_json::json!({
                "query": UPDATE_DISCUSSION_MUTATION,
                "variables": { "discussionId": discussion_id, "body": body },
            }))
            .await?;
        Ok(())
    }
}
