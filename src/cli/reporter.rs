//! Styled console reporter for the `publish` binary

use crate::cli::style::{Stylize, check, cross};
use proposal_publish::report::Reporter;

/// Reporter that prints styled progress lines to stderr
///
/// Progress goes to stderr so stdout stays clean for the final summary.
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn info(&self, message: &str) {
        eprintln!("{message}");
    }

    fn success(&self, message: &str) {
        eprintln!("{} {message}", check().for_stderr());
    }

    fn warn(&self, message: &str) {
        eprintln!("{}", format!("warning: {message}").warn());
    }

    fn error(&self, message: &str) {
        eprintln!("{} {}", cross(), message.error());
    }
}
