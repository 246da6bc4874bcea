//! Intermediate representation types for the Quill compiler.
//!
//! - [`Span`]: line/column source ranges attached to every node
//! - [`ast`]: the annotated syntax tree consumed by the checker and the
//!   emitter
//! - [`ensure_sufficient_stack`]: stack growth for the recursive passes
//!
//! The tree is a closed set of sum types. Every pass matches exhaustively on
//! [`ExprKind`] and [`StmtKind`], so adding a variant is a compile error at
//! each site that needs to handle it.

pub mod ast;
mod span;
mod stack;

pub use ast::{
    AssignTarget, BinaryOp, Block, CompareOp, Expr, ExprKind, FunctionDecl, Literal, LogicOp,
    Param, Program, Stmt, StmtKind,
};
pub use span::{LineCol, Span};
pub use stack::ensure_sufficient_stack;
