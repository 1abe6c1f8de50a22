//! Developer-warning side channel.
//!
//! Wiring mistakes (registering a component twice, mounting twice, passing
//! malformed root props) must never abort startup, so the application layer
//! reports them here instead of returning errors. A [`DiagnosticSink`] decides
//! where reports go: [`TracingSink`] forwards them to `tracing`, and
//! [`RecordingSink`] keeps them in memory for tests and tooling.
//!
//! # Routing
//!
//! ```text
//! App method ─► Reporter ─┬─► config.warn_handler   (when set)
//!                         └─► DiagnosticSink         (otherwise)
//! ```
//!
//! Reports are only produced in development builds (`FeatureFlags::dev`).

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// User-installed warning callback: `(message, trace)`.
pub type WarnHandler = Rc<dyn Fn(&str, Option<&str>)>;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Misuse that was tolerated; execution continued with a fallback.
    Warning,
    /// A failure that was contained; the operation did not complete.
    Error,
}

/// One developer-facing report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// Where the report originated, e.g. `at <App uid=0 root=Main>`.
    pub trace: Option<String>,
}

impl Diagnostic {
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            trace: None,
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            trace: None,
        }
    }

    #[must_use]
    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }
}

/// Destination for diagnostics.
pub trait DiagnosticSink {
    fn emit(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to `tracing` at the matching level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        let trace = diagnostic.trace.as_deref().unwrap_or("");
        match diagnostic.severity {
            Severity::Warning => tracing::warn!(trace = %trace, "{}", diagnostic.message),
            Severity::Error => tracing::error!(trace = %trace, "{}", diagnostic.message),
        }
    }
}

/// Keeps every diagnostic in memory. Clones share the same buffer.
///
/// # Example
///
/// ```
/// use hostkit::diagnostics::{Diagnostic, DiagnosticSink, RecordingSink};
///
/// let sink = RecordingSink::default();
/// sink.emit(Diagnostic::warning("duplicate registration"));
/// assert!(sink.contains("duplicate"));
/// ```
#[derive(Clone, Default)]
pub struct RecordingSink {
    records: Rc<RefCell<Vec<Diagnostic>>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of everything recorded so far.
    #[must_use]
    pub fn records(&self) -> Vec<Diagnostic> {
        self.records.borrow().clone()
    }

    /// Returns only the messages, in order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.records
            .borrow()
            .iter()
            .map(|d| d.message.clone())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    /// Returns `true` if any recorded message contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.records
            .borrow()
            .iter()
            .any(|d| d.message.contains(needle))
    }

    pub fn clear(&self) {
        self.records.borrow_mut().clear();
    }
}

impl DiagnosticSink for RecordingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        self.records.borrow_mut().push(diagnostic);
    }
}

impl fmt::Debug for RecordingSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingSink")
            .field("records", &self.len())
            .finish()
    }
}

/// A ready-to-use warning route for one application.
///
/// Cheap to clone; the application clones one out of its context before
/// emitting so no context borrow is held while user callbacks run.
#[derive(Clone)]
pub struct Reporter {
    enabled: bool,
    sink: Rc<dyn DiagnosticSink>,
    handler: Option<WarnHandler>,
    trace: Option<String>,
}

impl Reporter {
    /// Creates a reporter. When `enabled` is false every report is dropped.
    #[must_use]
    pub fn new(enabled: bool, sink: Rc<dyn DiagnosticSink>) -> Self {
        Self {
            enabled,
            sink,
            handler: None,
            trace: None,
        }
    }

    /// Routes warnings to `handler` instead of the sink.
    #[must_use]
    pub fn with_handler(mut self, handler: Option<WarnHandler>) -> Self {
        self.handler = handler;
        self
    }

    /// Attaches a trace line to every report.
    #[must_use]
    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }

    /// Returns `true` if reports are delivered at all.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// Reports a tolerated misuse.
    pub fn warn(&self, message: impl Into<String>) {
        if !self.enabled {
            return;
        }
        let message = message.into();
        if let Some(handler) = &self.handler {
            handler(&message, self.trace.as_deref());
            return;
        }
        let mut diagnostic = Diagnostic::warning(message);
        diagnostic.trace.clone_from(&self.trace);
        self.sink.emit(diagnostic);
    }

    /// Reports a contained failure. Always goes to the sink.
    pub fn error(&self, message: impl Into<String>) {
        let mut diagnostic = Diagnostic::error(message);
        diagnostic.trace.clone_from(&self.trace);
        self.sink.emit(diagnostic);
    }
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter")
            .field("enabled", &self.enabled)
            .field("has_handler", &self.handler.is_some())
            .field("trace", &self.trace)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn disabled_reporter_drops_warnings() {
        let sink = RecordingSink::new();
        let reporter = Reporter::new(false, Rc::new(sink.clone()));
        reporter.warn("ignored");
        assert!(sink.is_empty());
    }

    #[test]
    fn handler_takes_precedence_over_sink() {
        let sink = RecordingSink::new();
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let handler: WarnHandler = Rc::new(move |msg: &str, trace: Option<&str>| {
            assert_eq!(msg, "careful");
            assert_eq!(trace, Some("at <App uid=3 root=Main>"));
            seen.set(seen.get() + 1);
        });
        let reporter = Reporter::new(true, Rc::new(sink.clone()))
            .with_handler(Some(handler))
            .with_trace("at <App uid=3 root=Main>");

        reporter.warn("careful");
        assert_eq!(calls.get(), 1);
        assert!(sink.is_empty());
    }

    #[test]
    fn sink_receives_trace() {
        let sink = RecordingSink::new();
        Reporter::new(true, Rc::new(sink.clone()))
            .with_trace("at <App uid=0 root=Main>")
            .warn("twice");
        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].severity, Severity::Warning);
        assert_eq!(records[0].trace.as_deref(), Some("at <App uid=0 root=Main>"));
    }
}
