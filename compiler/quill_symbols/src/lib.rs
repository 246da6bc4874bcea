//! Lexical scopes, identifiers and functions for Quill.
//!
//! The [`SymbolTable`] owns every scope in an arena addressed by
//! [`ScopeId`]. Scopes form a tree rooted at the table's root scope, which
//! also holds the built-in functions. Identifiers carry a flow-sensitive
//! initialization record: the checker marks the blocks in which a variable is
//! definitely assigned and asks the table before each read.

mod builtins;
mod symbol;
mod table;

pub use builtins::BUILTINS;
pub use symbol::{
    Argument, Function, FunctionId, IdentId, Identifier, Initialization, Scope, ScopeId,
};
pub use table::SymbolTable;
