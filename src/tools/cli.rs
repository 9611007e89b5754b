//! Production tool implementations that shell out

use crate::error::{Error, Result};
use crate::tools::{BuildVerifier, PreflightCheck, ReviewTool, Summarizer};
use crate::types::ToolOutput;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Run a command, mapping a missing binary to `ToolNotFound`
async fn run_tool(workdir: &Path, program: &str, args: &[&str]) -> Result<ToolOutput> {
    tracing::debug!(program, ?args, "running tool");

    let output = Command::new(program)
        .args(args)
        .current_dir(workdir)
        .output()
        .await
        .map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                Error::ToolNotFound(program.to_string())
            } else {
                Error::Io(e)
            }
        })?;

    Ok(ToolOutput {
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

/// `git codereview mail` review submission
pub struct CodereviewCli {
    workdir: PathBuf,
}

impl CodereviewCli {
    /// Create a submitter rooted at the repository path
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }
}

#[async_trait]
impl ReviewTool for CodereviewCli {
    async fn submit(&self, commit_ref: &str) -> Result<ToolOutput> {
        run_tool(&self.workdir, "git", &["codereview", "mail", commit_ref]).await
    }
}

/// `cueckoo runtrybot` build-verification trigger
pub struct TrybotCli {
    workdir: PathBuf,
}

impl TrybotCli {
    /// Create a trigger rooted at the repository path
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }
}

#[async_trait]
impl BuildVerifier for TrybotCli {
    async fn trigger(&self, commit_hash: &str) -> Result<ToolOutput> {
        run_tool(&self.workdir, "cueckoo", &["runtrybot", commit_hash]).await
    }
}

/// `claude` CLI summarizer with piped input/output
pub struct ClaudeCli;

#[async_trait]
impl Summarizer for ClaudeCli {
    async fn summarize(&self, input: &str) -> Result<String> {
        tracing::debug!("running claude for summary generation");

        let mut child = Command::new("claude")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    Error::ToolNotFound("claude".to_string())
                } else {
                    Error::Io(e)
                }
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(input.as_bytes()).await?;
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(Error::Tool {
                tool: "claude".to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let summary = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if summary.is_empty() {
            return Err(Error::Tool {
                tool: "claude".to_string(),
                stderr: "empty summary returned".to_string(),
            });
        }

        Ok(summary)
    }
}

/// Repository test suite as the pre-flight check
pub struct RepoTests {
    workdir: PathBuf,
}

impl RepoTests {
    /// Create a check rooted at the repository path
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }
}

#[async_trait]
impl PreflightCheck for RepoTests {
    async fn run(&self) -> Result<ToolOutput> {
        run_tool(&self.workdir, "go", &["test", "./..."]).await
    }
}
