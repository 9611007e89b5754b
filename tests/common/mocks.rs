//! In-memory fakes for the workflow's trait seams
//!
//! Every fake records the calls it receives so tests can assert on what the
//! workflow did (and, for dry runs, did not) reach for.

use async_trait::async_trait;
use proposal_publish::error::{Error, Result};
use proposal_publish::git::{FileChange, GitBackend};
use proposal_publish::platform::DiscussionHost;
use proposal_publish::report::Reporter;
use proposal_publish::tools::{BuildVerifier, PreflightCheck, ReviewTool, Summarizer};
use proposal_publish::types::{Discussion, DiscussionCategory, ToolOutput};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;

/// In-memory git backend
///
/// Read queries are served from registered state; every mutation is recorded
/// in `calls` and otherwise ignored, which is exactly what dry-run purity
/// assertions need.
pub struct MockGit {
    workdir: TempDir,
    refs: Mutex<HashMap<String, String>>,
    changes: Mutex<HashMap<String, Vec<FileChange>>>,
    files: Mutex<HashMap<(String, String), String>>,
    commit_message: Mutex<String>,
    remote: Mutex<Option<String>>,
    calls: Mutex<Vec<String>>,
}

impl MockGit {
    pub fn new() -> Self {
        Self {
            workdir: TempDir::new().expect("tempdir"),
            refs: Mutex::new(HashMap::new()),
            changes: Mutex::new(HashMap::new()),
            files: Mutex::new(HashMap::new()),
            commit_message: Mutex::new(String::new()),
            remote: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Register a resolvable reference
    pub fn with_ref(self, refname: &str, hash: &str) -> Self {
        self.refs
            .lock()
            .unwrap()
            .insert(refname.to_string(), hash.to_string());
        self
    }

    /// Register the change set reported for a reference
    pub fn with_changes(self, refname: &str, changes: Vec<FileChange>) -> Self {
        self.changes
            .lock()
            .unwrap()
            .insert(refname.to_string(), changes);
        self
    }

    /// Register committed file content for `show_file`
    pub fn with_file(self, refname: &str, path: &str, content: &str) -> Self {
        self.files
            .lock()
            .unwrap()
            .insert((refname.to_string(), path.to_string()), content.to_string());
        self
    }

    /// Place a file in the fake working tree
    pub fn with_workdir_file(self, path: &str, content: &str) -> Self {
        let full = self.workdir.path().join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).expect("create workdir dirs");
        }
        std::fs::write(full, content).expect("write workdir file");
        self
    }

    /// Set the HEAD commit message for review recovery
    pub fn with_commit_message(self, message: &str) -> Self {
        *self.commit_message.lock().unwrap() = message.to_string();
        self
    }

    pub fn with_remote(self, url: &str) -> Self {
        *self.remote.lock().unwrap() = Some(url.to_string());
        self
    }

    /// All recorded mutation calls, in order
    pub fn mutation_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

#[async_trait]
impl GitBackend for MockGit {
    fn workdir(&self) -> &Path {
        self.workdir.path()
    }

    async fn resolve(&self, refname: &str) -> Result<String> {
        self.refs
            .lock()
            .unwrap()
            .get(refname)
            .cloned()
            .ok_or_else(|| Error::Git {
                command: format!("rev-parse {refname}"),
                stderr: "unknown revision".to_string(),
            })
    }

    async fn changed_files(&self, refname: &str) -> Result<Vec<FileChange>> {
        Ok(self
            .changes
            .lock()
            .unwrap()
            .get(refname)
            .cloned()
            .unwrap_or_default())
    }

    async fn show_file(&self, refname: &str, path: &str) -> Result<String> {
        self.files
            .lock()
            .unwrap()
            .get(&(refname.to_string(), path.to_string()))
            .cloned()
            .ok_or_else(|| Error::Git {
                command: format!("show {refname}:{path}"),
                stderr: "path does not exist".to_string(),
            })
    }

    async fn current_branch(&self) -> Result<String> {
        Ok("main".to_string())
    }

    async fn has_uncommitted_changes(&self) -> Result<bool> {
        Ok(false)
    }

    async fn rename(&self, from: &str, to: &str) -> Result<()> {
        self.record(format!("rename {from} -> {to}"));
        Ok(())
    }

    async fn stage(&self, path: &str) -> Result<()> {
        self.record(format!("stage {path}"));
        Ok(())
    }

    async fn amend(&self) -> Result<()> {
        self.record("amend");
        Ok(())
    }

    async fn create_branch(&self, name: &str, at: &str) -> Result<()> {
        self.record(format!("create_branch {name} {at}"));
        Ok(())
    }

    async fn checkout(&self, name: &str) -> Result<()> {
        self.record(format!("checkout {name}"));
        Ok(())
    }

    async fn delete_branch(&self, name: &str) -> Result<()> {
        self.record(format!("delete_branch {name}"));
        Ok(())
    }

    async fn stash_push(&self, _message: &str) -> Result<()> {
        self.record("stash_push");
        Ok(())
    }

    async fn stash_pop(&self) -> Result<()> {
        self.record("stash_pop");
        Ok(())
    }

    async fn cherry_pick(&self, commit: &str) -> Result<()> {
        self.record(format!("cherry_pick {commit}"));
        Ok(())
    }

    async fn cherry_pick_abort(&self) -> Result<()> {
        self.record("cherry_pick_abort");
        Ok(())
    }

    async fn count_commits(&self, _from: &str, _to: &str) -> Result<usize> {
        Ok(0)
    }

    async fn list_commits(&self, _from: &str, _to: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    async fn reset_hard(&self, target: &str) -> Result<()> {
        self.record(format!("reset_hard {target}"));
        Ok(())
    }

    async fn last_commit_message(&self) -> Result<String> {
        Ok(self.commit_message.lock().unwrap().clone())
    }

    async fn remote_url(&self, name: &str) -> Result<String> {
        self.remote
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Error::Git {
                command: format!("config --get remote.{name}.url"),
                stderr: "no such remote".to_string(),
            })
    }
}

/// In-memory discussion host with call tracking and error injection
pub struct MockHost {
    categories: Mutex<Vec<DiscussionCategory>>,
    discussions: Mutex<HashMap<u64, Discussion>>,
    next_number: Mutex<u64>,
    fail_create: Mutex<bool>,
    fail_update: Mutex<bool>,
    calls: Mutex<Vec<String>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            categories: Mutex::new(vec![
                DiscussionCategory {
                    id: "CAT_general".to_string(),
                    name: "General".to_string(),
                },
                DiscussionCategory {
                    id: "CAT_proposals".to_string(),
                    name: "Proposals".to_string(),
                },
            ]),
            discussions: Mutex::new(HashMap::new()),
            next_number: Mutex::new(4321),
            fail_create: Mutex::new(false),
            fail_update: Mutex::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_categories(self, categories: Vec<DiscussionCategory>) -> Self {
        *self.categories.lock().unwrap() = categories;
        self
    }

    pub fn with_discussion(self, discussion: Discussion) -> Self {
        self.discussions
            .lock()
            .unwrap()
            .insert(discussion.number, discussion);
        self
    }

    pub fn failing_create(self) -> Self {
        *self.fail_create.lock().unwrap() = true;
        self
    }

    pub fn failing_update(self) -> Self {
        *self.fail_update.lock().unwrap() = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls that would mutate the remote
    pub fn mutation_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with("create_discussion") || c.starts_with("update_discussion"))
            .collect()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

#[async_trait]
impl DiscussionHost for MockHost {
    async fn repository_id(&self) -> Result<String> {
        self.record("repository_id");
        Ok("R_repo".to_string())
    }

    async fn discussion_categories(&self) -> Result<Vec<DiscussionCategory>> {
        self.record("discussion_categories");
        Ok(self.categories.lock().unwrap().clone())
    }

    async fn create_discussion(
        &self,
        _repository_id: &str,
        category_id: &str,
        title: &str,
        body: &str,
    ) -> Result<Discussion> {
        self.record(format!("create_discussion {category_id} {title}"));

        if *self.fail_create.lock().unwrap() {
            return Err(Error::GitHubApi("injected create failure".to_string()));
        }

        let mut next = self.next_number.lock().unwrap();
        let number = *next;
        *next += 1;

        let discussion = Discussion {
            id: format!("D_{number}"),
            number,
            url: format!("https://github.com/cue-lang/proposal/discussions/{number}"),
            body: body.to_string(),
        };
        self.discussions
            .lock()
            .unwrap()
            .insert(number, discussion.clone());
        Ok(discussion)
    }

    async fn fetch_discussion(&self, number: u64) -> Result<Option<Discussion>> {
        self.record(format!("fetch_discussion {number}"));
        Ok(self.discussions.lock().unwrap().get(&number).cloned())
    }

    async fn update_discussion(&self, discussion_id: &str, body: &str) -> Result<()> {
        self.record(format!("update_discussion {discussion_id}"));

        if *self.fail_update.lock().unwrap() {
            return Err(Error::GitHubApi("injected update failure".to_string()));
        }

        let mut discussions = self.discussions.lock().unwrap();
        if let Some(d) = discussions.values_mut().find(|d| d.id == discussion_id) {
            d.body = body.to_string();
        }
        Ok(())
    }
}

/// Review tool returning a canned output
pub struct MockReviewTool {
    output: Mutex<ToolOutput>,
    calls: Mutex<Vec<String>>,
}

impl MockReviewTool {
    /// Successful submission printing a review URL
    pub fn succeeding(url: &str) -> Self {
        Self {
            output: Mutex::new(ToolOutput {
                success: true,
                stdout: String::new(),
                stderr: format!("remote:   {url} Proposal: demo [NEW]\n"),
            }),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Failed submission with the given combined output
    pub fn failing(stderr: &str) -> Self {
        Self {
            output: Mutex::new(ToolOutput {
                success: false,
                stdout: String::new(),
                stderr: stderr.to_string(),
            }),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReviewTool for MockReviewTool {
    async fn submit(&self, commit_ref: &str) -> Result<ToolOutput> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("submit {commit_ref}"));
        Ok(self.output.lock().unwrap().clone())
    }
}

/// Build verifier recording trigger calls
pub struct MockBuildVerifier {
    missing: bool,
    calls: Mutex<Vec<String>>,
}

impl MockBuildVerifier {
    pub fn new() -> Self {
        Self {
            missing: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Simulate the trigger binary not being installed
    pub fn not_installed() -> Self {
        Self {
            missing: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BuildVerifier for MockBuildVerifier {
    async fn trigger(&self, commit_hash: &str) -> Result<ToolOutput> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("trigger {commit_hash}"));

        if self.missing {
            return Err(Error::ToolNotFound("cueckoo".to_string()));
        }
        Ok(ToolOutput {
            success: true,
            stdout: "triggered\n".to_string(),
            stderr: String::new(),
        })
    }
}

/// Summarizer returning a fixed summary, or failing when given none
pub struct MockSummarizer {
    response: Option<String>,
}

impl MockSummarizer {
    pub fn returning(summary: &str) -> Self {
        Self {
            response: Some(summary.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self { response: None }
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, _input: &str) -> Result<String> {
        self.response
            .clone()
            .ok_or_else(|| Error::ToolNotFound("claude".to_string()))
    }
}

/// Pre-flight check with a canned result
pub struct MockPreflight {
    success: bool,
}

impl MockPreflight {
    pub fn passing() -> Self {
        Self { success: true }
    }

    pub fn failing() -> Self {
        Self { success: false }
    }
}

#[async_trait]
impl PreflightCheck for MockPreflight {
    async fn run(&self) -> Result<ToolOutput> {
        Ok(ToolOutput {
            success: self.success,
            stdout: if self.success {
                "ok\n".to_string()
            } else {
                "FAIL: demo_test\n".to_string()
            },
            stderr: String::new(),
        })
    }
}

/// Reporter that captures every message with its level
pub struct CapturingReporter {
    messages: Mutex<Vec<(String, String)>>,
}

impl CapturingReporter {
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
        }
    }

    pub fn messages(&self) -> Vec<(String, String)> {
        self.messages.lock().unwrap().clone()
    }

    /// Whether any message at the given level contains the needle
    pub fn contains(&self, level: &str, needle: &str) -> bool {
        self.messages()
            .iter()
            .any(|(l, m)| l == level && m.contains(needle))
    }

    fn push(&self, level: &str, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push((level.to_string(), message.to_string()));
    }
}

impl Reporter for CapturingReporter {
    fn info(&self, message: &str) {
        self.push("info", message);
    }

    fn success(&self, message: &str) {
        self.push("success", message);
    }

    fn warn(&self, message: &str) {
        self.push("warn", message);
    }

    fn error(&self, message: &str) {
        self.push("error", message);
    }
}
