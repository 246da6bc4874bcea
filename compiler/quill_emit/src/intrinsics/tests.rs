use pretty_assertions::assert_eq;
use quill_types::{ArrayType, ElementType};

use super::*;

fn instrs(name: &str, args: &[Type]) -> Vec<Instr> {
    template(name, args).unwrap().unwrap().into_vec()
}

#[test]
fn tostr_is_selected_by_argument_type() {
    assert_eq!(
        instrs("tostr", &[Type::Integer]),
        vec![Instr::Intrinsic(Intrinsic::IntToStr)]
    );
    assert_eq!(
        instrs("tostr", &[Type::Float]),
        vec![Instr::Intrinsic(Intrinsic::FloatToStr)]
    );
    assert_eq!(
        instrs("tostr", &[Type::Boolean]),
        vec![Instr::Intrinsic(Intrinsic::BoolToStr)]
    );
    assert_eq!(instrs("tostr", &[Type::String]), Vec::<Instr>::new());
}

#[test]
fn length_of_strings_and_arrays() {
    assert_eq!(
        instrs("length", &[Type::String]),
        vec![Instr::Intrinsic(Intrinsic::StrLen)]
    );
    let grid = Type::Array(ArrayType::new(ElementType::Float, 2));
    assert_eq!(
        instrs("length", &[grid]),
        vec![Instr::Intrinsic(Intrinsic::ArrayLen)]
    );
}

#[test]
fn unsupported_operands_are_errors() {
    assert_eq!(
        template("length", &[Type::Integer]).unwrap().unwrap_err(),
        LowerError::UnsupportedOperand {
            op: "length".to_owned(),
            ty: Type::Integer,
        }
    );
    let array = Type::Array(ArrayType::new(ElementType::String, 1));
    assert!(template("tostr", &[array]).unwrap().is_err());
}

#[test]
fn non_builtins_and_wrong_arity_have_no_template() {
    assert!(template("add", &[Type::Integer, Type::Integer]).is_none());
    assert!(template("readln", &[Type::String]).is_none());
    assert!(template("print", &[]).is_none());
}

#[test]
fn only_print_functions_are_void() {
    assert!(!returns_value("print"));
    assert!(!returns_value("println"));
    assert!(returns_value("readln"));
    assert!(returns_value("toint"));
}
