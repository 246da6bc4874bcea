//! Core diagnostic type and the constructor helpers used by every stage.

use std::fmt;
use std::path::{Path, PathBuf};

use quill_ir::Span;

use crate::ErrorCode;

/// Which of the two diagnostic sequences a finding belongs to.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DiagnosticKind {
    Syntax,
    Semantic,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::Syntax => write!(f, "syntax"),
            DiagnosticKind::Semantic => write!(f, "semantic"),
        }
    }
}

/// A single compiler finding.
///
/// Built with `Diagnostic::error(code).with_message(..).with_label(..)`.
/// Findings with no source position (missing entry point, lowering
/// failures) simply leave `span` empty.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub message: String,
    pub span: Option<Span>,
    /// Short text printed next to the underline.
    pub label: Option<String>,
    pub file: Option<PathBuf>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error(code: ErrorCode) -> Self {
        Diagnostic {
            code,
            message: String::new(),
            span: None,
            label: None,
            file: None,
            notes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Attach a source position. Dummy spans are dropped.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = (!span.is_dummy()).then_some(span);
        self
    }

    #[must_use]
    pub fn with_label(mut self, span: Span, label: impl Into<String>) -> Self {
        self = self.with_span(span);
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_file(mut self, file: impl AsRef<Path>) -> Self {
        self.file = Some(file.as_ref().to_path_buf());
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    #[inline]
    pub fn kind(&self) -> DiagnosticKind {
        self.code.kind()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error[{}]: {}", self.code, self.message)?;
        match (&self.file, self.span) {
            (Some(file), Some(span)) => write!(f, " at {}:{span}", file.display()),
            (None, Some(span)) => write!(f, " at {span}"),
            (Some(file), None) => write!(f, " in {}", file.display()),
            (None, None) => Ok(()),
        }
    }
}

// Semantic findings

pub fn duplicate_identifier(span: Span, name: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2006)
        .with_message(format!("identifier `{name}` is already declared in this scope"))
        .with_label(span, "redeclared here")
}

pub fn duplicate_function(span: Span, name: &str, arity: usize) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2007)
        .with_message(format!(
            "function `{name}` with {arity} argument{} is already declared",
            plural_s(arity)
        ))
        .with_label(span, "redeclared here")
        .with_note("overloads must differ in the number of arguments")
}

pub fn unknown_identifier(span: Span, name: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2003)
        .with_message(format!("cannot find identifier `{name}` in this scope"))
        .with_label(span, "not found")
}

pub fn unknown_function(span: Span, name: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2005)
        .with_message(format!("cannot find function `{name}`"))
        .with_label(span, "not found")
}

pub fn arg_count_mismatch(span: Span, name: &str, found: usize) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2004)
        .with_message(format!(
            "no overload of `{name}` takes {found} argument{}",
            plural_s(found)
        ))
        .with_label(span, "wrong number of arguments")
}

/// `context` names where the value is used: "assignment", "argument 2 of
/// `f`", "return value".
pub fn type_mismatch(span: Span, expected: &str, found: &str, context: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2001)
        .with_message(format!(
            "type mismatch in {context}: expected `{expected}`, found `{found}`"
        ))
        .with_label(span, format!("expected `{expected}`"))
}

pub fn invalid_condition(span: Span, found: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2011)
        .with_message(format!("condition must be `Boolean`, found `{found}`"))
        .with_label(span, "not a Boolean")
}

pub fn invalid_operands(span: Span, op: &str, lhs: &str, rhs: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2012)
        .with_message(format!("cannot apply `{op}` to `{lhs}` and `{rhs}`"))
        .with_label(span, "invalid operands")
}

pub fn invalid_operand(span: Span, op: &str, operand: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2012)
        .with_message(format!("cannot apply `{op}` to `{operand}`"))
        .with_label(span, "invalid operand")
}

pub fn invalid_index(span: Span, message: impl Into<String>) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2014)
        .with_message(message)
        .with_label(span, "invalid index")
}

/// The entry point is checked after every body, so there is no span.
pub fn missing_entry() -> Diagnostic {
    Diagnostic::error(ErrorCode::E2008)
        .with_message("entry function expected")
        .with_note("declare `function main(): Void`")
}

pub fn uninitialized_use(span: Span, name: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2009)
        .with_message(format!("use of possibly unassigned variable `{name}`"))
        .with_label(span, "not assigned on every path")
}

pub fn missing_return(span: Span, function: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2010)
        .with_message(format!("not all code paths in `{function}` return a value"))
        .with_label(span, "function declared here")
}

pub fn invalid_variable_type(span: Span, name: &str, ty: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2013)
        .with_message(format!("`{name}` cannot have type `{ty}`"))
        .with_label(span, "invalid type")
}

pub fn unknown_type(span: Span, name: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2002)
        .with_message(format!("unknown type `{name}`"))
        .with_label(span, "not a type")
}

// Lowering findings (never carry a span)

pub fn lowering_failed(message: impl fmt::Display) -> Diagnostic {
    Diagnostic::error(ErrorCode::E5001).with_message(format!("code generation failed: {message}"))
}

pub fn persistence_failed(message: impl fmt::Display) -> Diagnostic {
    Diagnostic::error(ErrorCode::E5002)
        .with_message(format!("could not write compiled program: {message}"))
}

#[inline]
pub(crate) fn plural_s(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
