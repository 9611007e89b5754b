//! Document synchronization: keep the in-document discussion link current

use crate::config::RepoConfig;
use crate::error::Result;
use crate::git::GitBackend;
use crate::report::Reporter;
use crate::types::Session;
use regex::Regex;
use std::sync::LazyLock;

// Matches the accepted field forms:
//   *   **Discussion Channel**: <value>
//   **Discussion Channel**: <value>
//   **Discussion Channel** GitHub: <value>
static DISCUSSION_FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\*\s+\*\*Discussion Channel\*\*:\s*|\*\*Discussion Channel\*\*\s*:?\s*(?:GitHub:?\s*)?)(.*)$",
    )
    .expect("hardcoded pattern is valid")
});

static AUTHOR_FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\*\s+\*\*Author\(s\)\*\*:").expect("hardcoded pattern is valid")
});

fn is_placeholder(value: &str) -> bool {
    value.contains("{link}") || value.contains("TBD") || value.contains("TODO")
}

/// Outcome of a link synchronization pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkSync {
    /// Content was rewritten with the link in place
    Updated(String),
    /// The field already holds a non-placeholder value; left untouched
    AlreadyLinked,
    /// No field and no author anchor to insert after; left unmodified
    MissingAnchor,
}

/// Idempotently set the discussion-link field in a proposal document
///
/// The first matching field line decides the outcome: a placeholder value is
/// replaced in place, a concrete value is preserved. When no field exists,
/// one is inserted after the author-list anchor.
pub fn apply_link(content: &str, url: &str) -> LinkSync {
    let lines: Vec<&str> = content.split('\n').collect();

    for (i, line) in lines.iter().enumerate() {
        if let Some(captures) = DISCUSSION_FIELD_RE.captures(line) {
            let prefix = captures.get(1).map_or("", |m| m.as_str());
            let value = captures.get(2).map_or("", |m| m.as_str());

            if !is_placeholder(value) {
                return LinkSync::AlreadyLinked;
            }

            let mut updated: Vec<String> = lines.iter().map(ToString::to_string).collect();
            updated[i] = format!("{prefix}{url}");
            return LinkSync::Updated(updated.join("\n"));
        }
    }

    // No field found; insert one after the author list
    for (i, line) in lines.iter().enumerate() {
        if AUTHOR_FIELD_RE.is_match(line) {
            let mut updated: Vec<String> = lines.iter().map(ToString::to_string).collect();
            updated.insert(i + 1, format!("*   **Discussion Channel**: {url}"));
            return LinkSync::Updated(updated.join("\n"));
        }
    }

    LinkSync::MissingAnchor
}

/// Synchronize the discussion link into the session's proposal document
///
/// Drafts read and write the working tree (post-rename); the caller stages
/// and amends. Numbered proposals read from the commit object and amend in
/// place only when the commit is the branch tip; otherwise the link is
/// deferred to the discussion body with a warning.
pub async fn sync_discussion_link(
    session: &mut Session,
    git: &dyn GitBackend,
    reporter: &dyn Reporter,
) -> Result<()> {
    if session.dry_run {
        reporter.info(&format!(
            "[dry run] Would update discussion link to {}",
            session.discussion_url
        ));
        return Ok(());
    }

    if session.is_draft() {
        let path = git.workdir().join(&session.renamed_path);
        let content = tokio::fs::read_to_string(&path).await?;

        match apply_link(&content, &session.discussion_url) {
            LinkSync::Updated(updated) => {
                tokio::fs::write(&path, updated).await?;
                reporter.success(&format!(
                    "Updated discussion link to {}",
                    session.discussion_url
                ));
            }
            LinkSync::AlreadyLinked => {
                reporter.info("Discussion link already set, leaving it untouched");
            }
            LinkSync::MissingAnchor => {
                reporter.warn("Could not find or add the discussion link field in the proposal");
            }
        }
        return Ok(());
    }

    // Numbered: the working tree may not match the target commit, so read
    // the committed content directly.
    let content = git
        .show_file(&session.commit_ref, &session.proposal_path)
        .await?;

    match apply_link(&content, &session.discussion_url) {
        LinkSync::Updated(updated) => {
            let head = git.resolve("HEAD").await?;
            if head == session.commit_hash {
                let path = git.workdir().join(&session.proposal_path);
                tokio::fs::write(&path, updated).await?;
                git.stage(&session.proposal_path).await?;
                git.amend().await?;
                // The target commit was replaced; later stages (content
                // publishing, review submission) must follow the amended
                // tip, not the original hash.
                session.commit_hash = git.resolve("HEAD").await?;
                session.commit_ref = "HEAD".to_string();
                reporter.success(&format!(
                    "Updated discussion link to {}",
                    session.discussion_url
                ));
            } else {
                reporter.warn(&format!(
                    "Cannot update discussion link in historical commit {}",
                    &session.commit_hash[..session.commit_hash.len().min(8)]
                ));
                reporter.info(
                    "The discussion link update will be included in the discussion content instead",
                );
            }
        }
        LinkSync::AlreadyLinked => {
            reporter.info("Discussion link already set, leaving it untouched");
        }
        LinkSync::MissingAnchor => {
            reporter.warn("Could not find or add the discussion link field in the proposal");
        }
    }

    Ok(())
}

static STALE_REFERENCE_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)(discussion|github discussion|gh discussion):\s*(TBD|TODO|xxxx|\[TBD\]|\[TODO\])",
        r"(?i)(tracking issue|issue):\s*(TBD|TODO|xxxx|\[TBD\]|\[TODO\])",
        r"(?i)(discussion|github discussion|gh discussion):\s*#?\s*xxxx",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("hardcoded pattern is valid"))
    .collect()
});

static BARE_PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bxxxx\b").expect("hardcoded pattern is valid"));

/// Rewrite stale in-document references to the assigned discussion
///
/// Pure core of [`update_document_references`]; returns `None` when nothing
/// changes. Bare `xxxx` tokens are only replaced when the document contains
/// no `xxxx-` filename examples.
pub fn apply_reference_updates(content: &str, discussion_id: &str, url: &str) -> Option<String> {
    let mut updated = content.to_string();
    let replacement = format!("Discussion: {url}");

    for re in STALE_REFERENCE_RES.iter() {
        updated = re.replace_all(&updated, replacement.as_str()).into_owned();
    }

    if !content.contains("xxxx-") {
        updated = BARE_PLACEHOLDER_RE
            .replace_all(&updated, discussion_id)
            .into_owned();
    }

    if updated == content { None } else { Some(updated) }
}

/// Update stale discussion references in a freshly renamed draft
///
/// Only runs for drafts outside dry-run, and only when the target commit is
/// the branch tip (amending anything else would fold the edit into the wrong
/// commit). No-op when the document has nothing stale.
pub async fn update_document_references(
    session: &mut Session,
    git: &dyn GitBackend,
    config: &RepoConfig,
    reporter: &dyn Reporter,
) -> Result<()> {
    if !session.is_draft() || session.dry_run {
        return Ok(());
    }

    let head = git.resolve("HEAD").await?;
    if head != session.commit_hash {
        reporter.warn("Skipping document reference updates for historical commit");
        return Ok(());
    }

    reporter.info(&format!(
        "Updating document references to discussion #{}...",
        session.discussion_id
    ));

    let path = git.workdir().join(&session.renamed_path);
    let content = tokio::fs::read_to_string(&path).await?;

    let url = config.discussion_url(&session.discussion_id);
    match apply_reference_updates(&content, &session.discussion_id, &url) {
        Some(updated) => {
            tokio::fs::write(&path, updated).await?;
            git.stage(&session.renamed_path).await?;
            git.amend().await?;
            session.commit_hash = git.resolve("HEAD").await?;
            reporter.success(&format!(
                "Updated document references to discussion #{}",
                session.discussion_id
            ));
        }
        None => {
            reporter.info("No document references needed updating");
        }
    }

    Ok(())
}
