//! CLI commands
//!
//! Command implementation for the `publish` binary.

mod publish;
mod reporter;
mod style;

pub use publish::run_publish;
