//! Runtime errors.

use crate::Value;

/// Execution stops at the first of these.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum VmError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: i64, len: usize },

    #[error("invalid array dimension {0}")]
    InvalidDimension(i64),

    #[error("no host routine `{0}` is registered")]
    UnknownHostRoutine(String),

    #[error("host routine `{routine}` failed: {message}")]
    HostFailure { routine: String, message: String },

    #[error("`{input}` is not a valid {expected}")]
    MalformedNumber { input: String, expected: &'static str },

    #[error("operand stack underflow in `{method}`")]
    StackUnderflow { method: String },

    #[error("`{method}` returned with {depth} value(s) on its operand stack, expected {expected}")]
    StackImbalance {
        method: String,
        depth: usize,
        expected: usize,
    },

    #[error("step limit of {0} exceeded")]
    StepLimitExceeded(u64),

    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid program: {0}")]
    InvalidProgram(String),

    #[error("console i/o failed: {0}")]
    Io(String),
}

impl VmError {
    pub(crate) fn type_mismatch(expected: &'static str, found: &Value) -> Self {
        VmError::TypeMismatch {
            expected,
            found: found.kind(),
        }
    }
}
