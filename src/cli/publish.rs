//! Publish command - run the publication workflow for one commit

use crate::cli::reporter::ConsoleReporter;
use crate::cli::style::{Stream, Stylize, arrow, hyperlink_url};
use proposal_publish::config::RepoConfig;
use proposal_publish::error::Result;
use proposal_publish::git::{GitBackend, GitCli};
use proposal_publish::platform::GitHubDiscussions;
use proposal_publish::tools::{ClaudeCli, CodereviewCli, RepoTests, TrybotCli};
use proposal_publish::types::Session;
use proposal_publish::workflow::{self, Collaborators};
use std::path::Path;

/// Run the publish command
pub async fn run_publish(path: &Path, commit_ref: &str, dry_run: bool, use_ai: bool) -> Result<()> {
    let reporter = ConsoleReporter;
    let git = GitCli::new(path);

    // Owner and repo come from the origin remote when one exists; a missing
    // or unparseable remote falls back to the canonical defaults.
    let config = match git.remote_url("origin").await {
        Ok(url) => RepoConfig::from_remote(&url).unwrap_or_default(),
        Err(_) => RepoConfig::default(),
    };

    let host = GitHubDiscussions::new(config.owner.clone(), config.repo.clone());
    let review = CodereviewCli::new(path);
    let build = TrybotCli::new(path);
    let summarizer = ClaudeCli;
    let preflight = RepoTests::new(path);

    if dry_run {
        println!("{}", "Dry run - no changes will be made".emphasis());
    }

    let mut session = Session::new(commit_ref, dry_run, use_ai);

    let collaborators = Collaborators {
        git: &git,
        host: &host,
        review: &review,
        build: &build,
        summarizer: &summarizer,
        preflight: &preflight,
        reporter: &reporter,
        config: &config,
    };

    workflow::run(&mut session, &collaborators).await?;

    print_summary(&session);
    Ok(())
}

/// Print the final run summary to stdout
fn print_summary(session: &Session) {
    println!();
    if session.dry_run {
        println!("{}", "Dry run complete. Would have published:".emphasis());
    } else {
        println!("{}", "Proposal published:".emphasis());
    }

    println!(
        "  {} Proposal: {}",
        arrow(),
        session.renamed_path.accent()
    );

    if !session.discussion_url.is_empty() {
        println!(
            "  {} Discussion #{}: {}",
            arrow(),
            session.discussion_id.accent(),
            hyperlink_url(Stream::Stdout, &session.discussion_url)
        );
    }

    if !session.review_url.is_empty() {
        println!(
            "  {} Review: {}",
            arrow(),
            hyperlink_url(Stream::Stdout, &session.review_url)
        );
    }
}
