//! Reporting trait for interface-agnostic status output
//!
//! The workflow never prints directly; every component receives a
//! [`Reporter`] so different frontends (styled CLI, capturing test sinks)
//! can render progress however they like.

/// Status reporting collaborator
///
/// Implement this trait to receive workflow status messages.
/// - The CLI implementation prints styled lines to stderr
/// - Tests substitute a capturing sink
pub trait Reporter: Send + Sync {
    /// Progress and informational messages
    fn info(&self, message: &str);

    /// A stage completed successfully
    fn success(&self, message: &str);

    /// Degraded but non-fatal conditions
    fn warn(&self, message: &str);

    /// Fatal condition detail (the error itself propagates separately)
    fn error(&self, message: &str);
}

/// No-op reporter for tests or embedding
pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn info(&self, _message: &str) {}
    fn success(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}
