//! Built-in function signatures seeded into every root scope.

use quill_types::Type;

/// `(name, [(argument name, type)], return type)`.
///
/// `Undefined` argument types accept any value.
pub const BUILTINS: &[(&str, &[(&str, Type)], Type)] = &[
    ("print", &[("value", Type::String)], Type::Void),
    ("println", &[("value", Type::String)], Type::Void),
    ("readln", &[], Type::String),
    ("tostr", &[("value", Type::Undefined)], Type::String),
    ("toint", &[("value", Type::String)], Type::Integer),
    ("tofloat", &[("value", Type::String)], Type::Float),
    ("length", &[("value", Type::Undefined)], Type::Integer),
];
