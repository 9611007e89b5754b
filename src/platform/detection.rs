//! Repository detection from remote URLs

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

static RE_SSH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"git@[^:]+:(.+?)(?:\.git)?$").expect("hardcoded pattern is valid"));
static RE_HTTPS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://[^/]+/(.+?)(?:\.git)?$").expect("hardcoded pattern is valid")
});

/// Parse `(owner, repo)` from a remote URL
///
/// Accepts SSH (`git@host:owner/repo.git`) and HTTPS
/// (`https://host/owner/repo.git`) forms.
pub fn parse_repo_info(url: &str) -> Result<(String, String)> {
    let path = RE_SSH
        .captures(url)
        .or_else(|| RE_HTTPS.captures(url))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| Error::Parse(format!("cannot parse remote URL: {url}")))?;

    let parts: Vec<&str> = path.split('/').collect();
    if parts.len() < 2 {
        return Err(Error::Parse(format!("invalid repo path: {path}")));
    }

    let repo = (*parts.last().expect("len checked above")).to_string();
    let owner = parts[..parts.len() - 1].join("/");

    Ok((owner, repo))
}
