//! Content publishing: build the discussion body and push it to the host

use crate::config::RepoConfig;
use crate::error::{Error, Result};
use crate::git::GitBackend;
use crate::platform::DiscussionHost;
use crate::report::Reporter;
use crate::tools::Summarizer;
use crate::types::Session;
use chrono::{DateTime, Utc};

/// Section headings accepted as a ready-made summary
const SUMMARY_HEADINGS: &[&str] = &["summary", "abstract", "objective", "overview"];

/// Maximum lines lifted from a summary section
const MAX_SUMMARY_LINES: usize = 20;

/// Maximum non-empty lines lifted from the introduction
const MAX_INTRO_LINES: usize = 10;

/// Prompt prepended to the proposal text when asking the summarizer
pub const SUMMARY_PROMPT: &str = "Summarize the following design proposal in 2-3 short paragraphs \
for a discussion post. Cover the problem being solved, the proposed approach, and any notable \
trade-offs. Output only the summary text, no preamble.";

/// Extract the proposal title from its leading `# Title` heading
pub fn extract_title(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        line.strip_prefix("# ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(ToString::to_string)
    })
}

fn is_metadata_bullet(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("*   **") || trimmed.starts_with("* **") || trimmed.starts_with("- **")
}

/// Extract a summary from the proposal text without external tools
///
/// Prefers a dedicated summary section; falls back to the introduction
/// paragraphs after the title, and finally to a pointer at the full document.
pub fn extract_summary(content: &str) -> String {
    let lines: Vec<&str> = content.lines().collect();

    // A dedicated summary section wins.
    for (i, line) in lines.iter().enumerate() {
        let heading = line.trim().to_lowercase();
        let is_summary_heading = SUMMARY_HEADINGS
            .iter()
            .any(|h| heading == format!("## {h}") || heading == format!("### {h}"));
        if !is_summary_heading {
            continue;
        }

        let mut section = Vec::new();
        let mut truncated = false;
        for l in &lines[i + 1..] {
            if l.trim_start().starts_with('#') {
                break;
            }
            if section.len() >= MAX_SUMMARY_LINES {
                truncated = true;
                break;
            }
            section.push(*l);
        }

        let mut summary = section.join("\n").trim().to_string();
        if summary.is_empty() {
            continue;
        }
        if truncated {
            summary.push_str("\n\n*[Summary truncated. See the full proposal for details.]*");
        }
        return summary;
    }

    // No section; lift the introduction between the title and the first
    // subsequent heading, skipping the metadata bullets.
    if let Some(title_idx) = lines.iter().position(|l| l.starts_with("# ")) {
        let mut intro = Vec::new();
        let mut taken = 0;
        for l in &lines[title_idx + 1..] {
            if l.trim_start().starts_with('#') || taken >= MAX_INTRO_LINES {
                break;
            }
            if is_metadata_bullet(l) {
                continue;
            }
            if l.trim().is_empty() {
                if !intro.is_empty() {
                    intro.push("");
                }
                continue;
            }
            intro.push(*l);
            taken += 1;
        }

        while intro.last().is_some_and(|l| l.is_empty()) {
            intro.pop();
        }
        if !intro.is_empty() {
            let mut summary = intro.join("\n").trim().to_string();
            summary.push_str("\n\n*[This is an excerpt. See the full proposal for details.]*");
            return summary;
        }
    }

    "See the full proposal document for details.".to_string()
}

/// Assemble the published discussion body
pub fn build_discussion_body(
    config: &RepoConfig,
    proposal_path: &str,
    review_url: &str,
    title: &str,
    summary: &str,
    updated_at: DateTime<Utc>,
) -> String {
    let blob_url = config.blob_url(proposal_path);

    let mut body = format!(
        "# {title}\n\
         \n\
         **Status**: Under review\n\
         \n\
         {summary}\n\
         \n\
         ## Full Proposal\n\
         \n\
         The complete proposal document is available at:\n\
         [{proposal_path}]({blob_url})\n"
    );

    if !review_url.is_empty() {
        body.push_str(&format!(
            "\nThe change introducing this proposal is under review at:\n{review_url}\n"
        ));
    }

    body.push_str(&format!(
        "\n## How to Comment\n\
         \n\
         Please use this discussion thread for feedback on the proposal. Comments on specific \
         wording belong on the review itself.\n\
         \n\
         ---\n\
         *Last updated: {}*",
        updated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    body
}

/// Publish the proposal summary to its discussion
///
/// Summarization prefers the generative tool when requested and degrades to
/// the heuristic extractor on any failure. Publishing failures are reported
/// with a manual-update pointer but never abort the run; the repository
/// state is already correct at this point.
pub async fn publish_content(
    session: &mut Session,
    git: &dyn GitBackend,
    host: &dyn DiscussionHost,
    summarizer: &dyn Summarizer,
    config: &RepoConfig,
    reporter: &dyn Reporter,
) -> Result<()> {
    reporter.info(&format!(
        "Publishing proposal content to discussion #{}...",
        session.discussion_id
    ));

    // In a draft dry run the rename never happened, so the commit still
    // holds the placeholder path.
    let path = if session.dry_run && session.is_draft() {
        &session.proposal_path
    } else {
        &session.renamed_path
    };
    let content = git.show_file(&session.commit_ref, path).await?;

    // Drafts were title-checked at discussion creation; a numbered document
    // without a heading still publishes under a generic title.
    let title = extract_title(&content).unwrap_or_else(|| "Design Proposal".to_string());

    let summary = if session.use_ai {
        reporter.info("Generating summary with AI...");
        match summarizer
            .summarize(&format!("{SUMMARY_PROMPT}\n\n{content}"))
            .await
        {
            Ok(summary) => summary,
            Err(e) => {
                reporter.warn(&format!(
                    "AI summary generation failed ({e}), falling back to extraction"
                ));
                extract_summary(&content)
            }
        }
    } else {
        extract_summary(&content)
    };

    let body = build_discussion_body(
        config,
        &session.renamed_path,
        &session.review_url,
        &title,
        &summary,
        Utc::now(),
    );

    if session.dry_run {
        reporter.info(&format!(
            "[dry run] Would update discussion #{} with title: {title}",
            session.discussion_id
        ));
        let preview: String = body.chars().take(500).collect();
        reporter.info(&format!("[dry run] Body preview:\n{preview}"));
        return Ok(());
    }

    let number: u64 = session
        .discussion_id
        .parse()
        .map_err(|_| Error::Parse(format!("discussion number: {}", session.discussion_id)))?;

    let published = async {
        let discussion = host
            .fetch_discussion(number)
            .await?
            .ok_or_else(|| Error::DiscussionNotFound(session.discussion_id.clone()))?;
        host.update_discussion(&discussion.id, &body).await
    }
    .await;

    match published {
        Ok(()) => {
            reporter.success(&format!(
                "Published proposal content to discussion #{}",
                session.discussion_id
            ));
        }
        Err(e) => {
            reporter.warn(&format!("Could not publish discussion content: {e}"));
            reporter.warn(&format!(
                "Please update manually at: {}",
                session.discussion_url
            ));
        }
    }

    Ok(())
}
