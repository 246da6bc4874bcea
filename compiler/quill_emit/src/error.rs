//! Errors produced while lowering and persisting programs.

use std::io;

use quill_types::Type;

use crate::Label;

/// Lowering stops at the first of these.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LowerError {
    #[error("operation `{op}` is not supported for `{ty}`")]
    UnsupportedOperand { op: String, ty: Type },

    #[error("no argument or local slot for `{0}`")]
    UnresolvedSlot(String),

    #[error("no method `{name}` taking {arity} argument(s)")]
    UnresolvedFunction { name: String, arity: usize },

    #[error("label {} in `{method}` is referenced but never marked", label.raw())]
    UnmarkedLabel { method: String, label: Label },

    #[error("malformed tree: {0}")]
    Malformed(String),
}

impl LowerError {
    pub(crate) fn unsupported(op: impl Into<String>, ty: Type) -> Self {
        LowerError::UnsupportedOperand { op: op.into(), ty }
    }
}

/// Failure writing or reading a persisted program.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("bytecode encoding: {0}")]
    Codec(#[from] bincode::Error),

    #[error("not a Quill bytecode file")]
    BadMagic,

    #[error("unsupported bytecode version {found} (expected {expected})")]
    UnsupportedVersion { found: u16, expected: u16 },
}
