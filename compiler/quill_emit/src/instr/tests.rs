use pretty_assertions::assert_eq;
use quill_types::Type;

use super::*;
use crate::{HostRoutine, Method};

fn method(name: &str, params: Vec<Type>, return_type: Type) -> Method {
    Method {
        name: name.to_owned(),
        params,
        return_type,
        locals: Vec::new(),
        code: Vec::new(),
        labels: Vec::new(),
        host: None,
    }
}

fn program() -> TargetProgram {
    TargetProgram {
        methods: vec![
            method("square", vec![Type::Integer], Type::Integer),
            method("log", vec![Type::String], Type::Void),
        ],
        strings: Vec::new(),
        host_routines: vec![HostRoutine {
            package: "math".to_owned(),
            name: "hypot".to_owned(),
            params: vec![Type::Float, Type::Float],
            return_type: Type::Float,
        }],
        entry: None,
    }
}

#[test]
fn calls_push_only_for_value_returning_callees() {
    let program = program();
    let square = Instr::Call {
        method: MethodId::new(0),
        argc: 1,
    };
    let log = Instr::Call {
        method: MethodId::new(1),
        argc: 1,
    };
    assert_eq!(square.stack_effect(&program), (1, 1));
    assert_eq!(log.stack_effect(&program), (1, 0));
    assert_eq!(
        Instr::CallHost(HostRoutineId::new(0)).stack_effect(&program),
        (2, 1)
    );
}

#[test]
fn array_access_pops_indices_and_array() {
    let program = TargetProgram::default();
    assert_eq!(Instr::LoadElem.stack_effect(&program), (2, 1));
    assert_eq!(Instr::StoreElem.stack_effect(&program), (3, 0));
    assert_eq!(Instr::ArrayGet { rank: 3 }.stack_effect(&program), (4, 1));
    assert_eq!(Instr::ArraySet { rank: 3 }.stack_effect(&program), (5, 0));
    assert_eq!(
        Instr::NewArray {
            element: ElementType::Boolean,
            rank: 2
        }
        .depth_delta(&program),
        -1
    );
}

#[test]
fn return_leaves_the_result_with_its_producer() {
    let program = program();
    assert_eq!(Instr::Return.stack_effect(&program), (0, 0));

    // `return square(x)`: the call's push is the method's net result.
    let code = [
        Instr::LoadArg(0),
        Instr::Call {
            method: MethodId::new(0),
            argc: 1,
        },
        Instr::Return,
    ];
    let depth: isize = code.iter().map(|i| i.depth_delta(&program)).sum();
    assert_eq!(depth, 1);
}

#[test]
fn intrinsic_effects() {
    assert_eq!(Intrinsic::Print.stack_effect(), (1, 0));
    assert_eq!(Intrinsic::ReadLn.stack_effect(), (0, 1));
    assert_eq!(Intrinsic::CharAt.stack_effect(), (2, 1));
    assert_eq!(Intrinsic::ArrayLen.stack_effect(), (1, 1));
}

#[test]
fn branch_targets() {
    let l = Label::new(7);
    assert_eq!(Instr::Jump(l).target(), Some(l));
    assert_eq!(
        Instr::BranchCmp {
            cond: Cond::Lt,
            ty: Numeric::Float,
            target: l
        }
        .target(),
        Some(l)
    );
    assert_eq!(Instr::Pop.target(), None);
}

#[test]
fn conditions_follow_compare_ops() {
    assert_eq!(Cond::from(CompareOp::Le), Cond::Le);
    assert!(Cond::Le.holds(&2, &2));
    assert!(!Cond::Lt.holds(&2, &2));
    assert!(Cond::Ne.holds(&1.5, &2.0));
    assert!(Cond::Ge.holds(&3.0, &-1.0));
}

#[test]
fn float_bits_round_trip() {
    let Instr::PushFloat(bits) = Instr::push_float(-0.25) else {
        panic!("expected PushFloat");
    };
    assert_eq!(f64::from_bits(bits), -0.25);
}
