//! Structured diagnostics for the VEQ prover.
//!
//! Engine-level conditions — unmodellable cells, divergent circuits,
//! per-module progress notes — are reported as [`Diagnostic`] values through
//! a thread-safe [`DiagnosticSink`] and rendered by the host.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::render;
pub use severity::Severity;
pub use sink::DiagnosticSink;
