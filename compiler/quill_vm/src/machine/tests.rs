use pretty_assertions::assert_eq;
use quill_check::check_program;
use quill_diagnostic::Diagnostics;
use quill_emit::{Emitter, Label, LocalSlot};
use quill_ir::{BinaryOp, Block, CompareOp, Expr, FunctionDecl, LogicOp, Param, Program, Stmt};
use quill_symbols::SymbolTable;
use quill_types::{ArrayType, ElementType, Type};

use super::*;
use crate::{BufferConsole, LabelCounter, NoopObserver};

fn compile(functions: Vec<FunctionDecl>) -> TargetProgram {
    let mut program = Program::new(functions);
    let mut symbols = SymbolTable::new();
    let mut diagnostics = Diagnostics::new();
    check_program(&mut program, &mut symbols, &mut diagnostics);
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
    Emitter::new().lower_program(&program).unwrap()
}

fn main_fn(stmts: Vec<Stmt>) -> FunctionDecl {
    FunctionDecl::new("main", Vec::new(), Type::Void, Block::new(stmts))
}

fn println_of(expr: Expr) -> Stmt {
    Stmt::expr(Expr::call("println", vec![Expr::call("tostr", vec![expr])]))
}

fn run(program: &TargetProgram) -> Result<String, VmError> {
    let mut console = BufferConsole::new();
    Vm::new(program, VmConfig::default()).run(&mut console, &mut NoopObserver)?;
    Ok(console.output().to_owned())
}

fn add_fn() -> FunctionDecl {
    FunctionDecl::new(
        "add",
        vec![Param::new("a", Type::Integer), Param::new("b", Type::Integer)],
        Type::Integer,
        Block::new(vec![Stmt::ret(Some(Expr::binary(
            BinaryOp::Add,
            Expr::ident("a"),
            Expr::ident("b"),
        )))]),
    )
}

/// `let i: Integer = 0; <loop over i < limit with i = i + 1>`
fn counting_loop(limit: i64, do_while: bool) -> Vec<Stmt> {
    let cond = Expr::compare(CompareOp::Lt, Expr::ident("i"), Expr::int(limit));
    let body = Block::new(vec![Stmt::assign(
        "i",
        Expr::binary(BinaryOp::Add, Expr::ident("i"), Expr::int(1)),
    )]);
    let lp = if do_while {
        Stmt::do_while(body, cond)
    } else {
        Stmt::while_loop(cond, body)
    };
    vec![
        Stmt::decl("i", Type::Integer, Some(Expr::int(0))),
        lp,
        println_of(Expr::ident("i")),
    ]
}

#[test]
fn add_and_main_prints_five() {
    let program = compile(vec![
        main_fn(vec![println_of(Expr::call(
            "add",
            vec![Expr::int(2), Expr::int(3)],
        ))]),
        add_fn(),
    ]);
    assert_eq!(run(&program).unwrap(), "5\n");
}

#[test]
fn run_method_returns_result() {
    let program = compile(vec![add_fn(), main_fn(Vec::new())]);
    let (add, _) = program.find_method("add", 2).unwrap();
    let mut vm = Vm::new(&program, VmConfig::default());
    let result = vm
        .run_method(
            add,
            vec![Value::Int(40), Value::Int(2)],
            &mut BufferConsole::new(),
            &mut NoopObserver,
        )
        .unwrap();
    assert_eq!(result, Some(Value::Int(42)));
}

#[test]
fn while_body_label_is_hit_once_per_iteration() {
    let program = compile(vec![main_fn(counting_loop(3, false))]);
    let mut console = BufferConsole::new();
    let mut counter = LabelCounter::new();
    Vm::new(&program, VmConfig::default())
        .run(&mut console, &mut counter)
        .unwrap();
    assert_eq!(console.output(), "3\n");

    // Labels 0/1/2 are the loop's cond/body/end.
    assert_eq!(counter.hits("main", Label::new(0)), 4);
    assert_eq!(counter.hits("main", Label::new(1)), 3);
    assert_eq!(counter.hits("main", Label::new(2)), 1);
    assert_eq!(
        counter.all_hits()[..3],
        [
            ("main", Label::new(0), 4),
            ("main", Label::new(1), 3),
            ("main", Label::new(2), 1),
        ]
    );
}

#[test]
fn while_with_false_condition_never_enters_body() {
    let program = compile(vec![main_fn(counting_loop(0, false))]);
    let mut console = BufferConsole::new();
    let mut counter = LabelCounter::new();
    Vm::new(&program, VmConfig::default())
        .run(&mut console, &mut counter)
        .unwrap();
    assert_eq!(console.output(), "0\n");
    assert_eq!(counter.hits("main", Label::new(1)), 0);
}

#[test]
fn do_while_body_runs_at_least_once() {
    let program = compile(vec![main_fn(counting_loop(0, true))]);
    let mut console = BufferConsole::new();
    let mut counter = LabelCounter::new();
    Vm::new(&program, VmConfig::default())
        .run(&mut console, &mut counter)
        .unwrap();
    assert_eq!(console.output(), "1\n");
    // Labels 0/1/2 are the loop's body/cond/end.
    assert_eq!(counter.hits("main", Label::new(0)), 1);
    assert_eq!(counter.hits("main", Label::new(1)), 1);
    assert_eq!(counter.hits("main", Label::new(2)), 1);
}

#[test]
fn do_while_repeats_until_condition_fails() {
    let program = compile(vec![main_fn(counting_loop(4, true))]);
    let mut counter = LabelCounter::new();
    let mut console = BufferConsole::new();
    Vm::new(&program, VmConfig::default())
        .run(&mut console, &mut counter)
        .unwrap();
    assert_eq!(console.output(), "4\n");
    assert_eq!(counter.hits("main", Label::new(0)), 4);
}

#[test]
fn if_else_picks_branch() {
    let sign = FunctionDecl::new(
        "sign",
        vec![Param::new("n", Type::Integer)],
        Type::String,
        Block::new(vec![Stmt::if_else(
            Expr::compare(CompareOp::Lt, Expr::ident("n"), Expr::int(0)),
            Block::new(vec![Stmt::ret(Some(Expr::string("negative")))]),
            Some(Block::new(vec![Stmt::ret(Some(Expr::string(
                "non-negative",
            )))])),
        )]),
    );
    let program = compile(vec![
        sign,
        main_fn(vec![
            Stmt::expr(Expr::call(
                "println",
                vec![Expr::call("sign", vec![Expr::int(-4)])],
            )),
            Stmt::expr(Expr::call(
                "println",
                vec![Expr::call("sign", vec![Expr::int(4)])],
            )),
        ]),
    ]);
    assert_eq!(run(&program).unwrap(), "negative\nnon-negative\n");
}

#[test]
fn recursion_uses_frames() {
    // fact(n) = if n <= 1 then 1 else n * fact(n - 1)
    let fact = FunctionDecl::new(
        "fact",
        vec![Param::new("n", Type::Integer)],
        Type::Integer,
        Block::new(vec![
            Stmt::if_else(
                Expr::compare(CompareOp::Le, Expr::ident("n"), Expr::int(1)),
                Block::new(vec![Stmt::ret(Some(Expr::int(1)))]),
                None,
            ),
            Stmt::ret(Some(Expr::binary(
                BinaryOp::Mul,
                Expr::ident("n"),
                Expr::call(
                    "fact",
                    vec![Expr::binary(BinaryOp::Sub, Expr::ident("n"), Expr::int(1))],
                ),
            ))),
        ]),
    );
    let program = compile(vec![
        fact,
        main_fn(vec![println_of(Expr::call("fact", vec![Expr::int(10)]))]),
    ]);
    assert_eq!(run(&program).unwrap(), "3628800\n");
}

#[test]
fn mixed_arithmetic_widens_to_float() {
    let program = compile(vec![main_fn(vec![
        Stmt::decl(
            "x",
            Type::Float,
            Some(Expr::binary(BinaryOp::Div, Expr::int(7), Expr::float(2.0))),
        ),
        println_of(Expr::ident("x")),
        println_of(Expr::binary(BinaryOp::Div, Expr::int(7), Expr::int(2))),
    ])]);
    assert_eq!(run(&program).unwrap(), "3.5\n3\n");
}

#[test]
fn strings_concatenate_compare_and_index() {
    let program = compile(vec![main_fn(vec![
        Stmt::decl(
            "s",
            Type::String,
            Some(Expr::binary(
                BinaryOp::Add,
                Expr::string("ab"),
                Expr::string("c"),
            )),
        ),
        Stmt::expr(Expr::call("println", vec![Expr::ident("s")])),
        println_of(Expr::call("length", vec![Expr::ident("s")])),
        Stmt::expr(Expr::call(
            "println",
            vec![Expr::index("s", vec![Expr::int(1)])],
        )),
        println_of(Expr::compare(
            CompareOp::Eq,
            Expr::ident("s"),
            Expr::string("abc"),
        )),
        println_of(Expr::compare(
            CompareOp::Ne,
            Expr::ident("s"),
            Expr::string("abc"),
        )),
    ])]);
    assert_eq!(run(&program).unwrap(), "abc\n3\nb\ntrue\nfalse\n");
}

#[test]
fn logic_and_not_produce_canonical_booleans() {
    let program = compile(vec![main_fn(vec![
        println_of(Expr::logic(
            LogicOp::Or,
            Expr::boolean(true),
            Expr::boolean(true),
        )),
        println_of(Expr::logic(
            LogicOp::And,
            Expr::boolean(true),
            Expr::not(Expr::boolean(true)),
        )),
        println_of(Expr::compare(
            CompareOp::Eq,
            Expr::logic(LogicOp::Or, Expr::boolean(true), Expr::boolean(true)),
            Expr::boolean(true),
        )),
    ])]);
    assert_eq!(run(&program).unwrap(), "true\nfalse\ntrue\n");
}

#[test]
fn multi_dimensional_arrays() {
    let grid_ty = Type::Array(ArrayType::new(ElementType::Integer, 2));
    let program = compile(vec![main_fn(vec![
        Stmt::decl(
            "grid",
            grid_ty,
            Some(Expr::new_array(
                ElementType::Integer,
                vec![Expr::int(2), Expr::int(3)],
            )),
        ),
        Stmt::assign_element("grid", vec![Expr::int(1), Expr::int(2)], Expr::int(7)),
        println_of(Expr::index("grid", vec![Expr::int(1), Expr::int(2)])),
        println_of(Expr::index("grid", vec![Expr::int(0), Expr::int(2)])),
        println_of(Expr::call("length", vec![Expr::ident("grid")])),
    ])]);
    assert_eq!(run(&program).unwrap(), "7\n0\n6\n");
}

#[test]
fn arrays_are_shared_between_caller_and_callee() {
    let row = Type::Array(ArrayType::new(ElementType::Integer, 1));
    let fill = FunctionDecl::new(
        "fill",
        vec![Param::new("xs", row)],
        Type::Void,
        Block::new(vec![Stmt::assign_element(
            "xs",
            vec![Expr::int(0)],
            Expr::int(11),
        )]),
    );
    let program = compile(vec![
        fill,
        main_fn(vec![
            Stmt::decl(
                "xs",
                row,
                Some(Expr::new_array(ElementType::Integer, vec![Expr::int(1)])),
            ),
            Stmt::expr(Expr::call("fill", vec![Expr::ident("xs")])),
            println_of(Expr::index("xs", vec![Expr::int(0)])),
        ]),
    ]);
    assert_eq!(run(&program).unwrap(), "11\n");
}

#[test]
fn readln_and_parsing() {
    let program = compile(vec![main_fn(vec![
        Stmt::decl(
            "n",
            Type::Integer,
            Some(Expr::call("toint", vec![Expr::call("readln", Vec::new())])),
        ),
        Stmt::decl(
            "f",
            Type::Float,
            Some(Expr::call("tofloat", vec![Expr::call("readln", Vec::new())])),
        ),
        println_of(Expr::binary(BinaryOp::Add, Expr::ident("n"), Expr::ident("f"))),
    ])]);
    let mut console = BufferConsole::with_input([" 40 ", "2.5"]);
    Vm::new(&program, VmConfig::default())
        .run(&mut console, &mut NoopObserver)
        .unwrap();
    assert_eq!(console.output(), "42.5\n");
}

#[test]
fn malformed_number_input() {
    let program = compile(vec![main_fn(vec![Stmt::expr(Expr::call(
        "toint",
        vec![Expr::string("12x")],
    ))])]);
    assert_eq!(
        run(&program).unwrap_err(),
        VmError::MalformedNumber {
            input: "12x".to_owned(),
            expected: "integer"
        }
    );
}

#[test]
fn integer_division_by_zero() {
    let program = compile(vec![main_fn(vec![println_of(Expr::binary(
        BinaryOp::Div,
        Expr::int(1),
        Expr::int(0),
    ))])]);
    assert_eq!(run(&program).unwrap_err(), VmError::DivisionByZero);
}

#[test]
fn index_out_of_bounds() {
    let row = Type::Array(ArrayType::new(ElementType::Integer, 1));
    let program = compile(vec![main_fn(vec![
        Stmt::decl(
            "xs",
            row,
            Some(Expr::new_array(ElementType::Integer, vec![Expr::int(2)])),
        ),
        println_of(Expr::index("xs", vec![Expr::int(2)])),
    ])]);
    assert_eq!(
        run(&program).unwrap_err(),
        VmError::IndexOutOfBounds { index: 2, len: 2 }
    );
}

#[test]
fn step_limit_stops_infinite_loop() {
    let program = compile(vec![main_fn(vec![Stmt::while_loop(
        Expr::boolean(true),
        Block::new(Vec::new()),
    )])]);
    let config = VmConfig {
        step_limit: Some(1_000),
    };
    let mut vm = Vm::new(&program, config);
    let err = vm
        .run(&mut BufferConsole::new(), &mut NoopObserver)
        .unwrap_err();
    assert_eq!(err, VmError::StepLimitExceeded(1_000));
}

#[test]
fn host_routines_are_called_by_binding() {
    let program = compile(vec![
        FunctionDecl::external(
            "abs",
            vec![Param::new("value", Type::Integer)],
            Type::Integer,
            "math",
        ),
        main_fn(vec![println_of(Expr::call("abs", vec![Expr::int(-9)]))]),
    ]);
    let mut console = BufferConsole::new();
    Vm::new(&program, VmConfig::default())
        .with_hosts(HostRegistry::standard())
        .run(&mut console, &mut NoopObserver)
        .unwrap();
    assert_eq!(console.output(), "9\n");

    // Without the binding the call fails.
    assert_eq!(
        run(&program).unwrap_err(),
        VmError::UnknownHostRoutine("math.abs".to_owned())
    );
}

#[test]
fn host_binding_follows_declared_parameter_types() {
    let program = compile(vec![
        FunctionDecl::external(
            "abs",
            vec![Param::new("value", Type::Float)],
            Type::Float,
            "math",
        ),
        main_fn(vec![println_of(Expr::call("abs", vec![Expr::float(-2.5)]))]),
    ]);
    let mut console = BufferConsole::new();
    Vm::new(&program, VmConfig::default())
        .with_hosts(HostRegistry::standard())
        .run(&mut console, &mut NoopObserver)
        .unwrap();
    assert_eq!(console.output(), "2.5\n");
}

fn hand_built(code: Vec<Instr>, return_type: Type) -> TargetProgram {
    TargetProgram {
        methods: vec![Method {
            name: "main".to_owned(),
            params: Vec::new(),
            return_type,
            locals: vec![LocalSlot {
                name: "x".to_owned(),
                ty: Type::Integer,
            }],
            code,
            labels: Vec::new(),
            host: None,
        }],
        strings: Vec::new(),
        host_routines: Vec::new(),
        entry: Some(MethodId::new(0)),
    }
}

#[test]
fn leftover_operand_is_a_stack_imbalance() {
    let program = hand_built(vec![Instr::PushInt(1), Instr::Return], Type::Void);
    assert_eq!(
        run(&program).unwrap_err(),
        VmError::StackImbalance {
            method: "main".to_owned(),
            depth: 1,
            expected: 0
        }
    );
}

#[test]
fn popping_empty_frame_is_underflow() {
    let program = hand_built(vec![Instr::StoreLocal(0), Instr::Return], Type::Void);
    assert_eq!(
        run(&program).unwrap_err(),
        VmError::StackUnderflow {
            method: "main".to_owned()
        }
    );
}

#[test]
fn running_off_the_end_is_invalid() {
    let program = hand_built(vec![Instr::Nop], Type::Void);
    assert!(matches!(
        run(&program).unwrap_err(),
        VmError::InvalidProgram(_)
    ));
}

#[test]
fn step_counter_matches_observer() {
    let program = compile(vec![main_fn(counting_loop(2, false))]);
    let mut counter = LabelCounter::new();
    let mut vm = Vm::new(&program, VmConfig::default());
    vm.run(&mut BufferConsole::new(), &mut counter).unwrap();
    assert_eq!(vm.steps(), counter.steps());
    assert!(vm.steps() > 0);
}
