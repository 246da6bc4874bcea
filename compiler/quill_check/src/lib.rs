//! Semantic checker for Quill.
//!
//! Populates a [`SymbolTable`](quill_symbols::SymbolTable), annotates every
//! expression in a [`Program`](quill_ir::Program) with its resolved type and
//! reports scope, type, definite-assignment and return-path findings into
//! [`Diagnostics`](quill_diagnostic::Diagnostics).
//!
//! Checking runs in two passes: every function signature is declared at the
//! root scope first, so bodies may call functions declared later in the
//! file. Expressions whose resolution fails are typed
//! [`Undefined`](quill_types::Type::Undefined), which silences follow-on
//! errors about them.

mod checker;
pub mod operators;

pub use checker::{check_program, Checker};
