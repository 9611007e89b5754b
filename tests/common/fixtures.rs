//! Proposal document fixtures

/// A draft proposal with a title, author metadata, and a placeholder link
pub const DRAFT_DOC: &str = "\
# Proposal: demo feature

*   **Author(s)**: Some One
*   **Discussion Channel**: TBD

This proposal introduces a demo feature so the workflow has something to
publish.

It keeps the scope deliberately small.

## Details

Much longer text lives here.
";

/// A draft proposal without a `# Title` heading
pub const NO_TITLE_DOC: &str = "\
*   **Author(s)**: Some One
*   **Discussion Channel**: TBD

A document that forgot its heading.
";

/// A numbered proposal whose discussion link is already set
pub const NUMBERED_DOC: &str = "\
# Proposal: demo feature

*   **Author(s)**: Some One
*   **Discussion Channel**: https://github.com/cue-lang/proposal/discussions/4014

This proposal introduces a demo feature.

## Summary

The short version of the demo feature.

## Details

Much longer text lives here.
";
