//! Diagnostic emitters.
//!
//! Rendering is kept behind the [`DiagnosticEmitter`] trait so the driver can
//! hand diagnostics to a terminal, a buffer in tests, or anything else that
//! wants them.

mod terminal;

pub use terminal::{ColorMode, TerminalEmitter};

use crate::Diagnostic;

/// Trait for emitting diagnostics in various formats.
pub trait DiagnosticEmitter {
    /// Emit a single diagnostic.
    fn emit(&mut self, diagnostic: &Diagnostic);

    /// Emit multiple diagnostics.
    fn emit_all(&mut self, diagnostics: &[Diagnostic]) {
        for diag in diagnostics {
            self.emit(diag);
        }
    }

    /// Flush any buffered output.
    fn flush(&mut self);

    /// Emit the closing "aborting due to" line.
    fn emit_summary(&mut self, error_count: usize);
}

/// Collects diagnostics instead of printing them.
impl DiagnosticEmitter for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        self.push(diagnostic.clone());
    }

    fn flush(&mut self) {}

    fn emit_summary(&mut self, _error_count: usize) {}
}
