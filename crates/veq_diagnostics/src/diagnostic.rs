//! Structured diagnostic messages with severity, codes, and notes.

use crate::code::DiagnosticCode;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};

/// A structured diagnostic message.
///
/// Diagnostics are the primary mechanism for reporting warnings and progress
/// notes from the proof engine. The netlist has no source text, so there are
/// no spans; context arrives as the module/cell names baked into the message
/// and as explanatory notes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The unique code identifying the type of diagnostic.
    pub code: DiagnosticCode,
    /// The main diagnostic message.
    pub message: String,
    /// Explanatory footnotes (e.g., "note: ...").
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Creates a new error diagnostic with the given code and message.
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            notes: Vec::new(),
        }
    }

    /// Creates a new warning diagnostic with the given code and message.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            notes: Vec::new(),
        }
    }

    /// Creates a new note diagnostic with the given code and message.
    pub fn note(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Note,
            code,
            message: message.into(),
            notes: Vec::new(),
        }
    }

    /// Adds a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Category;

    #[test]
    fn create_error() {
        let diag = Diagnostic::error(
            DiagnosticCode::new(Category::Error, 101),
            "consistency literal redefined",
        );
        assert_eq!(diag.severity, Severity::Error);
        assert!(diag.notes.is_empty());
    }

    #[test]
    fn create_warning_with_note() {
        let diag = Diagnostic::warning(
            DiagnosticCode::new(Category::Warning, 201),
            "cell type has no model",
        )
        .with_note("outputs treated as unconstrained");
        assert_eq!(diag.severity, Severity::Warning);
        assert_eq!(diag.notes.len(), 1);
    }

    #[test]
    fn create_note() {
        let diag = Diagnostic::note(DiagnosticCode::new(Category::Proof, 301), "no markers");
        assert_eq!(diag.severity, Severity::Note);
    }

    #[test]
    fn serde_roundtrip() {
        let diag = Diagnostic::warning(DiagnosticCode::new(Category::Warning, 1), "w");
        let json = serde_json::to_string(&diag).unwrap();
        let restored: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.message, "w");
        assert_eq!(restored.severity, Severity::Warning);
    }
}
