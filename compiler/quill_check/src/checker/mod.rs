//! The checker and its two passes.

mod expressions;
mod statements;

use std::path::PathBuf;

use quill_diagnostic::{
    duplicate_function, duplicate_identifier, invalid_variable_type, missing_entry,
    missing_return, Diagnostic, Diagnostics,
};
use quill_ir::{FunctionDecl, Program};
use quill_symbols::{Argument, ScopeId, SymbolTable};
use quill_types::Type;
use tracing::debug;

/// Check `program`, annotating it in place.
///
/// Findings go to `diagnostics`; `symbols` ends up holding every scope that
/// was opened.
pub fn check_program(
    program: &mut Program,
    symbols: &mut SymbolTable,
    diagnostics: &mut Diagnostics,
) {
    let mut checker = Checker::new(symbols, diagnostics, program.source.clone());
    checker.check(program);
}

/// Per-function facts needed while walking a body.
struct FnContext<'f> {
    name: &'f str,
    return_type: Type,
}

/// Walks a program once per pass, reporting into borrowed state.
pub struct Checker<'a> {
    symbols: &'a mut SymbolTable,
    diagnostics: &'a mut Diagnostics,
    file: Option<PathBuf>,
}

impl<'a> Checker<'a> {
    pub fn new(
        symbols: &'a mut SymbolTable,
        diagnostics: &'a mut Diagnostics,
        file: Option<PathBuf>,
    ) -> Self {
        Checker {
            symbols,
            diagnostics,
            file,
        }
    }

    pub fn check(&mut self, program: &mut Program) {
        let declared = self.declare_functions(&program.functions);

        for (func, ok) in program.functions.iter_mut().zip(declared) {
            if ok && !func.is_external() {
                self.check_function(func);
            }
        }

        let root = self.symbols.root();
        let has_entry = self
            .symbols
            .resolve_function(root, "main", 0)
            .is_some_and(|f| !f.is_builtin);
        if !has_entry {
            self.report(missing_entry());
        }

        debug!(
            functions = program.functions.len(),
            scopes = self.symbols.scope_count(),
            errors = self.diagnostics.len(),
            "checked program"
        );
    }

    /// First pass: declare every signature at the root. Returns, per
    /// function, whether its declaration succeeded (duplicates are not
    /// checked further).
    fn declare_functions(&mut self, functions: &[FunctionDecl]) -> Vec<bool> {
        let root = self.symbols.root();
        functions
            .iter()
            .map(|func| {
                for param in &func.params {
                    if !param.ty.is_valid_variable_type() {
                        self.report(invalid_variable_type(
                            param.span,
                            &param.name,
                            &param.ty.to_string(),
                        ));
                    }
                }
                let arguments = func
                    .params
                    .iter()
                    .enumerate()
                    .map(|(i, p)| Argument::new(p.name.clone(), p.ty, i + 1))
                    .collect();
                let ok = self
                    .symbols
                    .declare_function(root, &func.name, func.return_type, arguments);
                if !ok {
                    self.report(duplicate_function(func.span, &func.name, func.arity()));
                }
                ok
            })
            .collect()
    }

    /// Second pass for one function: arguments and top-level statements
    /// share the function's scope.
    fn check_function(&mut self, func: &mut FunctionDecl) {
        let root = self.symbols.root();
        let scope = self.symbols.create_child(root);

        for param in &func.params {
            match self
                .symbols
                .try_declare_identifier(scope, &param.name, param.ty)
            {
                Some(id) => self.symbols.mark_globally_initialized(id),
                None => self.report(duplicate_identifier(param.span, &param.name)),
            }
        }

        let ctx = FnContext {
            name: &func.name,
            return_type: func.return_type,
        };
        let returns = self.check_stmts(&mut func.body.stmts, scope, &ctx);
        if !returns && ctx.return_type != Type::Void {
            self.report(missing_return(func.span, ctx.name));
        }
        debug!(function = %func.name, returns, "checked function body");
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        let diagnostic = match &self.file {
            Some(file) => diagnostic.with_file(file),
            None => diagnostic,
        };
        self.diagnostics.report(diagnostic);
    }

    /// Copy block-local initializations from `from` up to `to`.
    fn promote_initialized(&mut self, from: ScopeId, to: ScopeId) {
        for id in self.symbols.initialized_in_block(from) {
            self.symbols.mark_assigned(id, to);
        }
    }
}
