//! Error codes for all compiler diagnostics.
//!
//! Each code is a stable identifier (e.g., `E2006`) whose first digit gives
//! the stage that produced it. Used by `quill explain` and by tests that need
//! to count specific findings.

use std::fmt;

use crate::DiagnosticKind;

/// Error codes for all compiler diagnostics.
///
/// Format: E#### where first digit indicates the stage:
/// - E1xxx: Syntax errors (reported by the front end)
/// - E2xxx: Semantic errors (scope and type checking)
/// - E5xxx: Lowering and persistence failures
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Syntax (E1xxx)
    /// Unexpected token
    E1001,
    /// Expected expression
    E1002,
    /// Unclosed delimiter
    E1003,

    // Semantic (E2xxx)
    /// Type mismatch
    E2001,
    /// Unknown type name
    E2002,
    /// Unknown identifier
    E2003,
    /// Argument count mismatch
    E2004,
    /// Unknown function
    E2005,
    /// Identifier already declared in this scope
    E2006,
    /// Function already declared with the same arity
    E2007,
    /// Entry function expected
    E2008,
    /// Use of a variable before definite assignment
    E2009,
    /// Not all code paths return a value
    E2010,
    /// Condition is not Boolean
    E2011,
    /// Invalid operand types for operator
    E2012,
    /// Invalid variable type
    E2013,
    /// Invalid index expression
    E2014,

    // Lowering (E5xxx)
    /// Internal lowering failure
    E5001,
    /// Persisting the program failed
    E5002,
}

impl ErrorCode {
    /// Every code, in numeric order.
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::E2005,
        ErrorCode::E2006,
        ErrorCode::E2007,
        ErrorCode::E2008,
        ErrorCode::E2009,
        ErrorCode::E2010,
        ErrorCode::E2011,
        ErrorCode::E2012,
        ErrorCode::E2013,
        ErrorCode::E2014,
        ErrorCode::E5001,
        ErrorCode::E5002,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E2008 => "E2008",
            ErrorCode::E2009 => "E2009",
            ErrorCode::E2010 => "E2010",
            ErrorCode::E2011 => "E2011",
            ErrorCode::E2012 => "E2012",
            ErrorCode::E2013 => "E2013",
            ErrorCode::E2014 => "E2014",
            ErrorCode::E5001 => "E5001",
            ErrorCode::E5002 => "E5002",
        }
    }

    /// Parse `"E2006"` (case-insensitive) back into a code.
    pub fn parse(text: &str) -> Option<ErrorCode> {
        let text = text.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|code| code.as_str().eq_ignore_ascii_case(text))
    }

    /// Which diagnostic sequence this code belongs to.
    pub fn kind(self) -> DiagnosticKind {
        if self.is_syntax_error() {
            DiagnosticKind::Syntax
        } else {
            DiagnosticKind::Semantic
        }
    }

    #[inline]
    pub fn is_syntax_error(self) -> bool {
        self.as_str().starts_with("E1")
    }

    #[inline]
    pub fn is_lowering_error(self) -> bool {
        self.as_str().starts_with("E5")
    }

    /// Long-form explanation shown by `quill explain`.
    pub fn description(self) -> &'static str {
        match self {
            ErrorCode::E1001 => "The parser met a token it did not expect at this position.",
            ErrorCode::E1002 => "An expression was required here but something else was found.",
            ErrorCode::E1003 => "An opening `(`, `[` or `{` has no matching closing delimiter.",
            ErrorCode::E2001 => {
                "A value's type does not match the type required by its context. Integer \
                 values widen to Float implicitly; no other conversion is implicit."
            }
            ErrorCode::E2002 => "The type name does not denote a Quill type.",
            ErrorCode::E2003 => {
                "The identifier is not declared in this scope or any enclosing one."
            }
            ErrorCode::E2004 => {
                "A function with this name exists, but not with this number of arguments."
            }
            ErrorCode::E2005 => "No function with this name is declared and none is built in.",
            ErrorCode::E2006 => {
                "A variable with this name is already declared in the same block. Shadowing a \
                 variable from an enclosing block is allowed."
            }
            ErrorCode::E2007 => {
                "A function with this name and the same number of arguments is already \
                 declared (or is built in). Overloads must differ in arity."
            }
            ErrorCode::E2008 => "Every program needs a `main` function taking no arguments.",
            ErrorCode::E2009 => {
                "The variable may be read before any value has been assigned to it on some \
                 execution path."
            }
            ErrorCode::E2010 => {
                "The function declares a return type but some path reaches the end of its \
                 body without returning a value."
            }
            ErrorCode::E2011 => "Conditions of `if`, `while` and `do-while` must be Boolean.",
            ErrorCode::E2012 => "The operator cannot be applied to operands of these types.",
            ErrorCode::E2013 => "Variables and arguments cannot have type Void.",
            ErrorCode::E2014 => {
                "Indexing needs an array (or string) and one Integer index per array rank."
            }
            ErrorCode::E5001 => {
                "Code generation met a tree it could not lower. This indicates a compiler bug: \
                 earlier stages should have rejected the program."
            }
            ErrorCode::E5002 => "The compiled program could not be written to its destination.",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
