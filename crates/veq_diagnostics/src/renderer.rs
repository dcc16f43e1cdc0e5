//! Plain-text rendering of diagnostics for terminal output.

use crate::diagnostic::Diagnostic;
use std::fmt::Write;

/// Renders a diagnostic as a single block of plain text.
///
/// Format: `severity[CODE]: message`, followed by one indented
/// `note: ...` line per note.
pub fn render(diag: &Diagnostic) -> String {
    let mut out = String::new();
    let _ = write!(out, "{}[{}]: {}", diag.severity, diag.code, diag.message);
    for note in &diag.notes {
        let _ = write!(out, "\n  note: {note}");
    }
    out
}
