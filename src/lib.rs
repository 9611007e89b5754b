//! proposal-publish - design proposal publication workflow
//!
//! Walks a single git commit containing a design-proposal document
//! (`designs/**/*.md`) through the publication lifecycle: discussion
//! creation, file renaming, in-document link synchronization, code review
//! submission, and build verification.
//!
//! All external collaborators (git, the GitHub discussion API, the review
//! and build tools) are consumed through narrow trait seams so the workflow
//! can be exercised against in-memory fakes.

pub mod auth;
pub mod config;
pub mod error;
pub mod git;
pub mod platform;
pub mod report;
pub mod tools;
pub mod types;
pub mod workflow;
