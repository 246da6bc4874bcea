//! Per-compilation diagnostic store.

use crate::{Diagnostic, DiagnosticEmitter, DiagnosticKind, ErrorCode};

/// The syntax and semantic findings of one compilation, in report order.
///
/// Owned by the compilation session and cleared with [`reset`](Self::reset)
/// at the start of every run.
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    syntax: Vec<Diagnostic>,
    semantic: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the sequence matching the diagnostic's kind.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        tracing::debug!(
            code = %diagnostic.code,
            message = %diagnostic.message,
            "diagnostic reported"
        );
        match diagnostic.kind() {
            DiagnosticKind::Syntax => self.syntax.push(diagnostic),
            DiagnosticKind::Semantic => self.semantic.push(diagnostic),
        }
    }

    #[inline]
    pub fn has_syntax_errors(&self) -> bool {
        !self.syntax.is_empty()
    }

    #[inline]
    pub fn has_semantic_errors(&self) -> bool {
        !self.semantic.is_empty()
    }

    #[inline]
    pub fn has_errors(&self) -> bool {
        self.has_syntax_errors() || self.has_semantic_errors()
    }

    pub fn reset(&mut self) {
        self.syntax.clear();
        self.semantic.clear();
    }

    pub fn syntax(&self) -> &[Diagnostic] {
        &self.syntax
    }

    pub fn semantic(&self) -> &[Diagnostic] {
        &self.semantic
    }

    /// Syntax findings first, then semantic, each in report order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.syntax.iter().chain(&self.semantic)
    }

    pub fn len(&self) -> usize {
        self.syntax.len() + self.semantic.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of findings carrying `code`.
    pub fn count(&self, code: ErrorCode) -> usize {
        self.iter().filter(|d| d.code == code).count()
    }

    /// Forward everything to `emitter`, then the summary line.
    pub fn render(&self, emitter: &mut dyn DiagnosticEmitter) {
        emitter.emit_all(&self.syntax);
        emitter.emit_all(&self.semantic);
        emitter.emit_summary(self.len());
        emitter.flush();
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        for diagnostic in iter {
            self.report(diagnostic);
        }
    }
}
