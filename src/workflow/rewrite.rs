//! History rewriting: rename the draft and amend the containing commit

use crate::config::DRAFT_PREFIX;
use crate::error::{Error, Result};
use crate::git::GitBackend;
use crate::report::Reporter;
use crate::types::Session;
use crate::workflow::document::sync_discussion_link;

/// Rename a draft to its numbered filename and fold the rename into history
///
/// Numbered proposals skip the rename but still get a link sync. Drafts at
/// the branch tip are amended in place. Drafts buried in history are
/// rewritten on a temporary branch and the descendants replayed on top; the
/// original branch is restored on any failure.
pub async fn rewrite_history(
    session: &mut Session,
    git: &dyn GitBackend,
    reporter: &dyn Reporter,
) -> Result<()> {
    if session.is_numbered() {
        session.renamed_path = session.proposal_path.clone();
        return sync_discussion_link(session, git, reporter).await;
    }

    let new_basename = session
        .basename
        .replacen(DRAFT_PREFIX, &format!("{}-", session.discussion_id), 1);
    let renamed_path = session
        .proposal_path
        .rsplit_once('/')
        .map_or_else(|| new_basename.clone(), |(dir, _)| format!("{dir}/{new_basename}"));

    if session.dry_run {
        reporter.info(&format!(
            "[dry run] Would rename {} to {renamed_path}",
            session.proposal_path
        ));
        session.renamed_path = renamed_path;
        return sync_discussion_link(session, git, reporter).await;
    }

    reporter.info(&format!(
        "Renaming {} to {renamed_path}...",
        session.proposal_path
    ));
    session.renamed_path = renamed_path;

    let head = git.resolve("HEAD").await?;
    if head == session.commit_hash {
        return rewrite_tip(session, git, reporter).await;
    }

    rewrite_historical(session, git, reporter).await
}

/// Amend the branch tip with the rename and link update
async fn rewrite_tip(
    session: &mut Session,
    git: &dyn GitBackend,
    reporter: &dyn Reporter,
) -> Result<()> {
    git.rename(&session.proposal_path, &session.renamed_path)
        .await?;
    sync_discussion_link(session, git, reporter).await?;
    git.stage(&session.renamed_path).await?;
    git.amend().await?;

    session.commit_hash = git.resolve("HEAD").await?;
    session.commit_ref = "HEAD".to_string();

    reporter.success(&format!(
        "Renamed proposal and amended commit {}",
        &session.commit_hash[..session.commit_hash.len().min(8)]
    ));
    Ok(())
}

/// Rewrite a historical commit on a temporary branch and replay descendants
///
/// All temporary state (stash, branch, in-progress cherry-pick) is unwound
/// at this call site before the result propagates.
async fn rewrite_historical(
    session: &mut Session,
    git: &dyn GitBackend,
    reporter: &dyn Reporter,
) -> Result<()> {
    reporter.info(&format!(
        "Commit {} is not at HEAD, rewriting history...",
        &session.commit_hash[..session.commit_hash.len().min(8)]
    ));

    let mut stashed = false;
    if git.has_uncommitted_changes().await? {
        reporter.info("Stashing uncommitted changes...");
        git.stash_push("proposal-publish: temporary stash for history rewrite")
            .await?;
        stashed = true;
    }

    let original_branch = git.current_branch().await?;
    let temp_branch = format!(
        "proposal-rename-{}",
        chrono::Utc::now().format("%Y%m%d%H%M%S")
    );

    let result = rewrite_on_temp_branch(session, git, reporter, &temp_branch, &original_branch).await;

    if result.is_err() {
        // A failed cherry-pick leaves the replay in progress; unwind it
        // before switching back.
        let _ = git.cherry_pick_abort().await;
        let _ = git.checkout(&original_branch).await;
    }
    let _ = git.delete_branch(&temp_branch).await;

    if stashed {
        reporter.info("Restoring stashed changes...");
        if let Err(e) = git.stash_pop().await {
            reporter.warn(&format!("Could not restore stashed changes: {e}"));
        }
    }

    let rewritten = result?;
    session.commit_hash = rewritten.clone();
    session.commit_ref = rewritten;

    reporter.success(&format!(
        "Rewrote history; proposal commit is now {}",
        &session.commit_hash[..session.commit_hash.len().min(8)]
    ));
    Ok(())
}

/// The fallible middle of the historical rewrite
///
/// On success the original branch is checked out again, pointing at the
/// rebuilt history, and the hash of the rewritten proposal commit is
/// returned. Cleanup of the temporary branch belongs to the caller.
async fn rewrite_on_temp_branch(
    session: &mut Session,
    git: &dyn GitBackend,
    reporter: &dyn Reporter,
    temp_branch: &str,
    original_branch: &str,
) -> Result<String> {
    git.create_branch(temp_branch, &session.commit_hash).await?;

    git.rename(&session.proposal_path, &session.renamed_path)
        .await?;
    sync_discussion_link(session, git, reporter).await?;
    git.stage(&session.renamed_path).await?;
    git.amend().await?;

    let rewritten = git.resolve("HEAD").await?;

    let descendants = git
        .count_commits(&session.commit_hash, original_branch)
        .await?;

    let tip = if descendants == 0 {
        rewritten.clone()
    } else {
        reporter.info(&format!("Replaying {descendants} descendant commit(s)..."));
        let commits = git
            .list_commits(&session.commit_hash, original_branch)
            .await?;
        for commit in &commits {
            git.cherry_pick(commit).await.map_err(|e| {
                let stderr = match &e {
                    Error::Git { stderr, .. } => stderr.clone(),
                    other => other.to_string(),
                };
                Error::CherryPick {
                    commit: commit[..commit.len().min(8)].to_string(),
                    message: stderr,
                }
            })?;
        }
        git.resolve("HEAD").await?
    };

    git.checkout(original_branch).await?;
    git.reset_hard(&tip).await?;

    Ok(rewritten)
}
