//! Version-control access for the publication workflow
//!
//! Git is consumed through the narrow [`GitBackend`] capability trait with
//! one production implementation that shells out ([`GitCli`]) and in-memory
//! fakes on the test side. This is the seam that makes the history
//! rewriter's destructive paths testable without a real repository.

mod cli;

pub use cli::GitCli;

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// A file touched by a commit, as reported by rename-aware diffing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    /// File added in the commit
    Added(String),
    /// File modified in the commit
    Modified(String),
    /// File deleted in the commit
    Deleted(String),
    /// File renamed in the commit
    Renamed {
        /// Path before the rename
        from: String,
        /// Path after the rename
        to: String,
    },
}

impl FileChange {
    /// The path this change lands on (rename target for renames)
    pub fn path(&self) -> &str {
        match self {
            Self::Added(p) | Self::Modified(p) | Self::Deleted(p) => p,
            Self::Renamed { to, .. } => to,
        }
    }
}

/// Parse `git diff-tree --name-status -r -M` output into typed changes
///
/// Unrecognized status letters (copies, type changes) are skipped.
pub fn parse_name_status(output: &str) -> Vec<FileChange> {
    let mut changes = Vec::new();

    for line in output.lines() {
        let parts: Vec<&str> = line.split('\t').collect();
        if parts.len() < 2 {
            continue;
        }

        let status = parts[0];
        match status {
            "A" => changes.push(FileChange::Added(parts[1].to_string())),
            "M" => changes.push(FileChange::Modified(parts[1].to_string())),
            "D" => changes.push(FileChange::Deleted(parts[1].to_string())),
            s if s.starts_with('R') => {
                if parts.len() < 3 {
                    continue;
                }
                changes.push(FileChange::Renamed {
                    from: parts[1].to_string(),
                    to: parts[2].to_string(),
                });
            }
            _ => {}
        }
    }

    changes
}

/// Capability interface over the version-control system
///
/// The command surface is exactly what the workflow consumes: read-only
/// queries for the inspector and synchronizer, working-tree and history
/// mutations for the rewriter.
#[async_trait]
pub trait GitBackend: Send + Sync {
    /// Root of the working tree (for direct file reads/writes)
    fn workdir(&self) -> &Path;

    /// Resolve a reference to a full commit hash
    async fn resolve(&self, refname: &str) -> Result<String>;

    /// Files changed in a commit relative to its parent, with rename detection
    async fn changed_files(&self, refname: &str) -> Result<Vec<FileChange>>;

    /// Read a file's content as of a commit (`git show ref:path`)
    async fn show_file(&self, refname: &str, path: &str) -> Result<String>;

    /// Name of the currently checked-out branch
    async fn current_branch(&self) -> Result<String>;

    /// Whether the working tree has uncommitted changes
    async fn has_uncommitted_changes(&self) -> Result<bool>;

    /// Rename a tracked file (`git mv`)
    async fn rename(&self, from: &str, to: &str) -> Result<()>;

    /// Stage a path
    async fn stage(&self, path: &str) -> Result<()>;

    /// Amend the current HEAD commit, keeping its message
    async fn amend(&self) -> Result<()>;

    /// Create and switch to a branch rooted at a commit
    async fn create_branch(&self, name: &str, at: &str) -> Result<()>;

    /// Switch to an existing branch
    async fn checkout(&self, name: &str) -> Result<()>;

    /// Force-delete a branch
    async fn delete_branch(&self, name: &str) -> Result<()>;

    /// Stash uncommitted changes with a message
    async fn stash_push(&self, message: &str) -> Result<()>;

    /// Restore the most recent stash
    async fn stash_pop(&self) -> Result<()>;

    /// Replay a commit onto the current branch
    async fn cherry_pick(&self, commit: &str) -> Result<()>;

    /// Abort an in-progress cherry-pick
    async fn cherry_pick_abort(&self) -> Result<()>;

    /// Number of commits in `from..to`
    async fn count_commits(&self, from: &str, to: &str) -> Result<usize>;

    /// Commits in `from..to`, oldest first
    async fn list_commits(&self, from: &str, to: &str) -> Result<Vec<String>>;

    /// Hard-reset the current branch to a commit
    async fn reset_hard(&self, target: &str) -> Result<()>;

    /// Full message of the HEAD commit
    async fn last_commit_message(&self) -> Result<String>;

    /// URL of a named remote
    async fn remote_url(&self, name: &str) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_added_and_modified() {
        let output = "A\tdesigns/language/xxxx-demo.md\nM\tREADME.md\n";
        let changes = parse_name_status(output);
        assert_eq!(
            changes,
            vec![
                FileChange::Added("designs/language/xxxx-demo.md".to_string()),
                FileChange::Modified("README.md".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_rename_with_score() {
        let output = "R097\tdesigns/old.md\tdesigns/new.md";
        let changes = parse_name_status(output);
        assert_eq!(
            changes,
            vec![FileChange::Renamed {
                from: "designs/old.md".to_string(),
                to: "designs/new.md".to_string(),
            }]
        );
        assert_eq!(changes[0].path(), "designs/new.md");
    }

    #[test]
    fn test_parse_skips_garbage_and_unknown_status() {
        let output = "not a diff line\nT\tsome/file\nD\tgone.md\n\n";
        let changes = parse_name_status(output);
        assert_eq!(changes, vec![FileChange::Deleted("gone.md".to_string())]);
    }

    #[test]
    fn test_parse_rename_missing_target_skipped() {
        let changes = parse_name_status("R100\tonly-one-path");
        assert!(changes.is_empty());
    }
}
