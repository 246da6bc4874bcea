//! Operand typing for the fixed set of binary, comparison and logical
//! operators.
//!
//! Each function returns the result type, or `None` when the operator does
//! not apply to the operand types. Callers handle `Undefined` operands
//! before asking.

use quill_ir::{BinaryOp, CompareOp};
use quill_types::{Numeric, Type};

/// `+ - * /` on numbers promote to the wider operand; `+` also concatenates
/// two strings.
pub fn binary_result(op: BinaryOp, lhs: Type, rhs: Type) -> Option<Type> {
    match (lhs.numeric(), rhs.numeric()) {
        (Some(l), Some(r)) => Some(Numeric::widest(l, r).to_type()),
        _ if op == BinaryOp::Add && lhs == Type::String && rhs == Type::String => {
            Some(Type::String)
        }
        _ => None,
    }
}

/// Ordering needs two numbers; equality also accepts two strings or two
/// booleans.
pub fn compare_result(op: CompareOp, lhs: Type, rhs: Type) -> Option<Type> {
    if lhs.is_numeric() && rhs.is_numeric() {
        return Some(Type::Boolean);
    }
    let same_scalar = lhs == rhs && matches!(lhs, Type::String | Type::Boolean);
    (op.is_equality() && same_scalar).then_some(Type::Boolean)
}

/// `and` / `or` / `not` work on booleans only.
pub fn logic_result(lhs: Type, rhs: Type) -> Option<Type> {
    (lhs == Type::Boolean && rhs == Type::Boolean).then_some(Type::Boolean)
}

/// Built-ins declared with an "any value" parameter still restrict what
/// they accept: `tostr` takes a scalar, `length` a string or an array.
pub fn builtin_accepts(name: &str, arg: Type) -> bool {
    match name {
        "tostr" => matches!(
            arg,
            Type::Integer | Type::Float | Type::Boolean | Type::String
        ),
        "length" => arg == Type::String || arg.as_array().is_some(),
        _ => true,
    }
}

#[cfg(test)]
mod tests;
