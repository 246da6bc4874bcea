//! Diagnostic system for Quill.
//!
//! Every finding carries:
//! - an [`ErrorCode`] whose leading digit names the stage (syntax, semantic,
//!   lowering)
//! - a message (what went wrong)
//! - an optional span and file (where it went wrong)
//! - notes (context)
//!
//! Findings are collected, never thrown. A [`Diagnostics`] value holds the
//! syntax and semantic sequences for one compilation; the driver inspects it
//! after each stage and stops once anything has been reported. Rendering is
//! delegated to a [`DiagnosticEmitter`].

mod collection;
mod diagnostic;
pub mod emitter;
mod error_code;

pub use collection::Diagnostics;
pub use diagnostic::{
    arg_count_mismatch, duplicate_function, duplicate_identifier, invalid_condition,
    invalid_index, invalid_operand, invalid_operands, invalid_variable_type, lowering_failed,
    missing_entry, missing_return, persistence_failed, type_mismatch, uninitialized_use,
    unknown_function, unknown_identifier, unknown_type, Diagnostic, DiagnosticKind,
};
pub use emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
pub use error_code::ErrorCode;
