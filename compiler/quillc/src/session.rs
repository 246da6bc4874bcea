//! One compilation at a time: check, lower, persist.

use quill_check::check_program;
use quill_diagnostic::{Diagnostics, DiagnosticEmitter};
use quill_emit::{AssemblySink, BytecodeSink, Emitter, MemorySink, ProgramSink, TargetProgram};
use quill_ir::Program;
use quill_symbols::SymbolTable;
use tracing::debug;

use crate::{OutputFormat, SessionConfig};

/// Owns all per-compilation state.
///
/// Everything is rebuilt by [`reset`](Self::reset) at the start of each
/// [`compile`](Self::compile), so one session can compile many programs in
/// sequence without findings leaking between them.
pub struct CompilationSession {
    config: SessionConfig,
    symbols: SymbolTable,
    diagnostics: Diagnostics,
    emitter: Emitter,
}

impl CompilationSession {
    pub fn new(config: SessionConfig) -> Self {
        CompilationSession {
            config,
            symbols: SymbolTable::new(),
            diagnostics: Diagnostics::new(),
            emitter: Emitter::new(),
        }
    }

    /// Fresh symbol table, no diagnostics.
    pub fn reset(&mut self) {
        self.symbols = SymbolTable::new();
        self.diagnostics.reset();
        self.emitter.reset();
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Check `program` and lower it.
    ///
    /// Returns `None` as soon as a stage reports anything; the findings are
    /// left in [`diagnostics`](Self::diagnostics).
    pub fn compile(&mut self, program: &mut Program) -> Option<TargetProgram> {
        self.reset();
        if program.source.is_none() {
            program.source.clone_from(&self.config.source_path);
        }

        check_program(program, &mut self.symbols, &mut self.diagnostics);
        if self.diagnostics.has_errors() {
            debug!(
                errors = self.diagnostics.len(),
                "checking failed, skipping lowering"
            );
            return None;
        }

        let mut sink = self.sink();
        let lowered = self
            .emitter
            .emit_program(program, sink.as_mut(), &mut self.diagnostics)?;
        debug!(
            methods = lowered.methods.len(),
            output = ?self.config.output,
            "compilation finished"
        );
        Some(lowered)
    }

    /// Render every finding of the last run.
    pub fn render_diagnostics(&self, emitter: &mut dyn DiagnosticEmitter) {
        self.diagnostics.render(emitter);
    }

    fn sink(&self) -> Box<dyn ProgramSink> {
        match (&self.config.output, self.config.format) {
            (None, _) => Box::new(MemorySink::new()),
            (Some(path), OutputFormat::Bytecode) => Box::new(BytecodeSink::new(path.clone())),
            (Some(path), OutputFormat::Assembly) => Box::new(AssemblySink::new(path.clone())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
