//! Discussion management: create for drafts, verify for numbered proposals

use crate::config::{DRAFT_PREFIX, PROPOSAL_EXT, RepoConfig};
use crate::error::{Error, Result};
use crate::git::GitBackend;
use crate::platform::DiscussionHost;
use crate::report::Reporter;
use crate::types::Session;
use crate::workflow::content::extract_title;

/// Placeholder discussion number assigned in dry-run mode
pub const DRY_RUN_DISCUSSION_ID: &str = "1234";

/// Phrases marking a holding body that has not been published yet
///
/// Used by verification to accept discussions whose body does not yet name
/// the proposal path.
const PLACEHOLDER_PHRASES: &[&str] = &[
    "coming soon",
    "being prepared for review",
    "draft under review",
];

/// Build the holding body posted when a discussion is first created
///
/// The full proposal content is synchronized later, once the discussion
/// number is known and the file has been renamed.
fn holding_body(proposal_name: &str) -> String {
    format!(
        "This proposal is currently under review.\n\
         \n\
         **Proposal**: {proposal_name}\n\
         **Status**: Draft under review\n\
         **Category**: Proposal\n\
         \n\
         The full proposal content will be published to this discussion once the review process completes.\n\
         \n\
         ---\n\
         *This discussion was created automatically by the proposal publication workflow.*"
    )
}

/// Whether a discussion body plausibly belongs to the given proposal
///
/// Substring heuristic: the body must mention the proposal path or carry one
/// of the known placeholder phrases.
pub fn body_matches_proposal(body: &str, proposal_path: &str) -> bool {
    let body = body.to_lowercase();
    if body.contains(&proposal_path.to_lowercase()) {
        return true;
    }
    PLACEHOLDER_PHRASES.iter().any(|phrase| body.contains(phrase))
}

/// Create a discussion for a draft proposal
///
/// Reads the proposal content as of the inspected commit (not the working
/// copy). The title check runs before the dry-run short-circuit, so a dry
/// run still catches missing titles without touching the remote.
pub async fn create_discussion(
    session: &mut Session,
    git: &dyn GitBackend,
    host: &dyn DiscussionHost,
    config: &RepoConfig,
    reporter: &dyn Reporter,
) -> Result<()> {
    reporter.info("Creating discussion for draft proposal...");

    let content = git
        .show_file(&session.commit_ref, &session.proposal_path)
        .await?;

    let title = extract_title(&content)
        .ok_or_else(|| Error::MissingTitle(session.proposal_path.clone()))?;

    let proposal_name = session
        .basename
        .trim_start_matches(DRAFT_PREFIX)
        .trim_end_matches(PROPOSAL_EXT);
    let body = holding_body(proposal_name);

    if session.dry_run {
        reporter.info(&format!(
            "[dry run] Would create discussion with title: {title}"
        ));
        session.discussion_id = DRY_RUN_DISCUSSION_ID.to_string();
        session.discussion_url = config.discussion_url(DRY_RUN_DISCUSSION_ID);
        return Ok(());
    }

    let categories = host.discussion_categories().await?;
    if categories.is_empty() {
        return Err(Error::NoDiscussionCategories);
    }

    let category = categories
        .iter()
        .find(|c| c.name == "Proposals" || c.name == "Proposal")
        .unwrap_or_else(|| {
            reporter.warn(&format!(
                "Could not find 'Proposals' category, using: {}",
                categories[0].name
            ));
            &categories[0]
        });

    reporter.info(&format!("Creating discussion with title: {title}"));

    let repository_id = host.repository_id().await?;
    let discussion = host
        .create_discussion(&repository_id, &category.id, &title, &body)
        .await?;

    session.discussion_id = discussion.number.to_string();
    session.discussion_url = discussion.url;

    reporter.success(&format!(
        "Created discussion #{}: {}",
        session.discussion_id, session.discussion_url
    ));
    Ok(())
}

/// Verify that an existing discussion belongs to a numbered proposal
///
/// Read-only, so it also runs under dry-run.
pub async fn verify_discussion(
    session: &mut Session,
    host: &dyn DiscussionHost,
    reporter: &dyn Reporter,
) -> Result<()> {
    reporter.info(&format!(
        "Verifying discussion #{} belongs to this proposal...",
        session.discussion_id
    ));

    let number: u64 = session
        .discussion_id
        .parse()
        .map_err(|_| Error::Parse(format!("discussion number: {}", session.discussion_id)))?;

    let discussion = host
        .fetch_discussion(number)
        .await?
        .ok_or_else(|| Error::DiscussionNotFound(session.discussion_id.clone()))?;

    if discussion.body.is_empty() {
        return Err(Error::DiscussionNotFound(session.discussion_id.clone()));
    }

    if !body_matches_proposal(&discussion.body, &session.proposal_path) {
        reporter.error(&format!(
            "Discussion #{} body does not mention the proposal file or draft indicators",
            session.discussion_id
        ));
        let preview: String = discussion.body.chars().take(200).collect();
        reporter.error(&format!("Discussion body preview:\n{preview}"));
        return Err(Error::DiscussionMismatch(session.discussion_id.clone()));
    }

    session.discussion_url = discussion.url;
    reporter.success(&format!(
        "Verified discussion #{} belongs to this proposal",
        session.discussion_id
    ));
    Ok(())
}
