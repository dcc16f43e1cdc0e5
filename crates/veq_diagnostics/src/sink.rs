//! Diagnostic accumulator for a proof session.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use std::cell::RefCell;

/// Accumulates the diagnostics of one proof run.
///
/// The induction engine is single-threaded and synchronous, so this is a
/// plain interior-mutability buffer, not a synchronization point: callers
/// hold `&DiagnosticSink` (the worker and driver emit through shared
/// references) and the sink hands the collected diagnostics to the host
/// for rendering when the run is over.
pub struct DiagnosticSink {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl DiagnosticSink {
    /// Creates a new empty diagnostic sink.
    pub fn new() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    /// Emits a diagnostic into the sink.
    pub fn emit(&self, diag: Diagnostic) {
        self.diagnostics.borrow_mut().push(diag);
    }

    /// Counts the accumulated diagnostics of one severity.
    pub fn count_of(&self, severity: Severity) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Returns `true` if any error-severity diagnostics have been emitted.
    pub fn has_errors(&self) -> bool {
        self.count_of(Severity::Error) > 0
    }

    /// Takes all accumulated diagnostics, leaving the sink empty.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diagnostics.borrow_mut())
    }

    /// Returns a snapshot of all accumulated diagnostics without draining.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{Category, DiagnosticCode};

    fn make_error() -> Diagnostic {
        Diagnostic::error(DiagnosticCode::new(Category::Error, 101), "test error")
    }

    fn make_warning() -> Diagnostic {
        Diagnostic::warning(DiagnosticCode::new(Category::Warning, 201), "test warning")
    }

    #[test]
    fn empty_sink() {
        let sink = DiagnosticSink::new();
        assert!(!sink.has_errors());
        assert_eq!(sink.count_of(Severity::Error), 0);
        assert!(sink.take_all().is_empty());
    }

    #[test]
    fn emit_error() {
        let sink = DiagnosticSink::new();
        sink.emit(make_error());
        assert!(sink.has_errors());
        assert_eq!(sink.count_of(Severity::Error), 1);
    }

    #[test]
    fn emit_warning_not_error() {
        let sink = DiagnosticSink::new();
        sink.emit(make_warning());
        assert!(!sink.has_errors());
        assert_eq!(sink.count_of(Severity::Warning), 1);
        assert_eq!(sink.diagnostics().len(), 1);
    }

    #[test]
    fn take_all_drains_everything() {
        let sink = DiagnosticSink::new();
        sink.emit(make_error());
        sink.emit(make_warning());
        assert_eq!(sink.take_all().len(), 2);
        assert!(sink.take_all().is_empty());
        assert!(!sink.has_errors());
    }

    #[test]
    fn snapshot_does_not_drain() {
        let sink = DiagnosticSink::new();
        sink.emit(make_warning());
        assert_eq!(sink.diagnostics().len(), 1);
        assert_eq!(sink.diagnostics().len(), 1);
        assert_eq!(sink.count_of(Severity::Warning), 1);
    }

    #[test]
    fn emit_during_snapshot_iteration_is_fine() {
        let sink = DiagnosticSink::new();
        sink.emit(make_warning());
        for _ in sink.diagnostics() {
            sink.emit(make_error());
        }
        assert_eq!(sink.count_of(Severity::Error), 1);
    }
}
