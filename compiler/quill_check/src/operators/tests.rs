use quill_types::{ArrayType, ElementType};

use super::*;

#[test]
fn arithmetic_promotes_to_widest() {
    assert_eq!(binary_result(BinaryOp::Add, Type::Integer, Type::Integer), Some(Type::Integer));
    assert_eq!(binary_result(BinaryOp::Mul, Type::Integer, Type::Float), Some(Type::Float));
    assert_eq!(binary_result(BinaryOp::Div, Type::Float, Type::Integer), Some(Type::Float));
}

#[test]
fn only_addition_concatenates() {
    assert_eq!(binary_result(BinaryOp::Add, Type::String, Type::String), Some(Type::String));
    assert_eq!(binary_result(BinaryOp::Sub, Type::String, Type::String), None);
    assert_eq!(binary_result(BinaryOp::Add, Type::String, Type::Integer), None);
    assert_eq!(binary_result(BinaryOp::Add, Type::Boolean, Type::Boolean), None);
}

#[test]
fn comparisons() {
    assert_eq!(compare_result(CompareOp::Lt, Type::Integer, Type::Float), Some(Type::Boolean));
    assert_eq!(compare_result(CompareOp::Eq, Type::String, Type::String), Some(Type::Boolean));
    assert_eq!(compare_result(CompareOp::Ne, Type::Boolean, Type::Boolean), Some(Type::Boolean));
    assert_eq!(compare_result(CompareOp::Lt, Type::String, Type::String), None);
    assert_eq!(compare_result(CompareOp::Eq, Type::String, Type::Integer), None);
    assert_eq!(compare_result(CompareOp::Eq, Type::Void, Type::Void), None);
}

#[test]
fn logic_needs_booleans() {
    assert_eq!(logic_result(Type::Boolean, Type::Boolean), Some(Type::Boolean));
    assert_eq!(logic_result(Type::Boolean, Type::Integer), None);
}

#[test]
fn builtins_restrict_any_value_parameters() {
    let ints = Type::Array(ArrayType::new(ElementType::Integer, 1));
    assert!(builtin_accepts("tostr", Type::Boolean));
    assert!(builtin_accepts("tostr", Type::String));
    assert!(!builtin_accepts("tostr", ints));
    assert!(builtin_accepts("length", Type::String));
    assert!(builtin_accepts("length", ints));
    assert!(!builtin_accepts("length", Type::Integer));
    assert!(builtin_accepts("println", Type::Integer));
}
