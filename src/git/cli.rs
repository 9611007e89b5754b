//! Production git backend that shells out to the `git` binary

use crate::error::{Error, Result};
use crate::git::{FileChange, GitBackend, parse_name_status};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Git backend invoking the `git` CLI in a fixed working directory
pub struct GitCli {
    workdir: PathBuf,
}

impl GitCli {
    /// Create a backend rooted at the given repository path
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    /// Run a git command, returning stdout on success
    async fn run(&self, args: &[&str]) -> Result<String> {
        tracing::debug!(?args, "running git");

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .await?;

        if !output.status.success() {
            return Err(Error::Git {
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[async_trait]
impl GitBackend for GitCli {
    fn workdir(&self) -> &Path {
        &self.workdir
    }

    async fn resolve(&self, refname: &str) -> Result<String> {
        let out = self.run(&["rev-parse", refname]).await?;
        Ok(out.trim().to_string())
    }

    async fn changed_files(&self, refname: &str) -> Result<Vec<FileChange>> {
        let out = self
            .run(&[
                "diff-tree",
                "--no-commit-id",
                "--name-status",
                "-r",
                "-M",
                refname,
            ])
            .await?;
        Ok(parse_name_status(&out))
    }

    async fn show_file(&self, refname: &str, path: &str) -> Result<String> {
        self.run(&["show", &format!("{refname}:{path}")]).await
    }

    async fn current_branch(&self) -> Result<String> {
        let out = self.run(&["rev-parse", "--abbrev-ref", "HEAD"]).await?;
        Ok(out.trim().to_string())
    }

    async fn has_uncommitted_changes(&self) -> Result<bool> {
        let out = self.run(&["status", "--porcelain"]).await?;
        Ok(!out.trim().is_empty())
    }

    async fn rename(&self, from: &str, to: &str) -> Result<()> {
        self.run(&["mv", from, to]).await.map(drop)
    }

    async fn stage(&self, path: &str) -> Result<()> {
        self.run(&["add", path]).await.map(drop)
    }

    async fn amend(&self) -> Result<()> {
        self.run(&["commit", "--amend", "--no-edit"]).await.map(drop)
    }

    async fn create_branch(&self, name: &str, at: &str) -> Result<()> {
        self.run(&["checkout", "-b", name, at]).await.map(drop)
    }

    async fn checkout(&self, name: &str) -> Result<()> {
        self.run(&["checkout", name]).await.map(drop)
    }

    async fn delete_branch(&self, name: &str) -> Result<()> {
        self.run(&["branch", "-D", name]).await.map(drop)
    }

    async fn stash_push(&self, message: &str) -> Result<()> {
        self.run(&["stash", "push", "-m", message]).await.map(drop)
    }

    async fn stash_pop(&self) -> Result<()> {
        self.run(&["stash", "pop"]).await.map(drop)
    }

    async fn cherry_pick(&self, commit: &str) -> Result<()> {
        self.run(&["cherry-pick", commit]).await.map(drop)
    }

    async fn cherry_pick_abort(&self) -> Result<()> {
        self.run(&["cherry-pick", "--abort"]).await.map(drop)
    }

    async fn count_commits(&self, from: &str, to: &str) -> Result<usize> {
        let out = self
            .run(&["rev-list", "--count", &format!("{from}..{to}")])
            .await?;
        out.trim()
            .parse()
            .map_err(|_| Error::Parse(format!("rev-list count output: {}", out.trim())))
    }

    async fn list_commits(&self, from: &str, to: &str) -> Result<Vec<String>> {
        let out = self
            .run(&["rev-list", "--reverse", &format!("{from}..{to}")])
            .await?;
        Ok(out.split_whitespace().map(ToString::to_string).collect())
    }

    async fn reset_hard(&self, target: &str) -> Result<()> {
        self.run(&["reset", "--hard", target]).await.map(drop)
    }

    async fn last_commit_message(&self) -> Result<String> {
        self.run(&["log", "-1", "--format=%B"]).await
    }

    async fn remote_url(&self, name: &str) -> Result<String> {
        let out = self
            .run(&["config", "--get", &format!("remote.{name}.url")])
            .await?;
        Ok(out.trim().to_string())
    }
}
