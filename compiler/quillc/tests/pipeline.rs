//! End-to-end: annotated tree → session → persisted program → interpreter.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;
use quill_diagnostic::ErrorCode;
use quill_emit::load_bytecode;
use quill_ir::{BinaryOp, Block, Expr, FunctionDecl, Param, Program, Stmt};
use quill_types::Type;
use quill_vm::{BufferConsole, NoopObserver, VmConfig};
use quillc::commands::execute;
use quillc::{CompilationSession, OutputFormat, SessionConfig};

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

/// `main` printing `add(2, 3)`.
fn add_program() -> Program {
    let main = FunctionDecl::new(
        "main",
        Vec::new(),
        Type::Void,
        Block::new(vec![Stmt::expr(Expr::call(
            "println",
            vec![Expr::call(
                "tostr",
                vec![Expr::call("add", vec![Expr::int(2), Expr::int(3)])],
            )],
        ))]),
    );
    Program::new(vec![add_fn(), main])
}

#[test]
fn add_program_round_trips_through_bytecode_and_prints_five() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("add.qbc");

    let mut session =
        CompilationSession::new(SessionConfig::writing_to(&path, OutputFormat::Bytecode));
    let compiled = session.compile(&mut add_program()).unwrap();
    assert!(session.diagnostics().is_empty());

    let loaded = load_bytecode(&path).unwrap();
    assert_eq!(loaded, compiled);

    let mut console = BufferConsole::new();
    let result = execute(&loaded, VmConfig::default(), &mut console, &mut NoopObserver).unwrap();
    assert_eq!(result, None);
    assert_eq!(console.output(), "5\n");
}

#[test]
fn assembly_output_lists_every_method() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("add.qasm");

    let mut session =
        CompilationSession::new(SessionConfig::writing_to(&path, OutputFormat::Assembly));
    session.compile(&mut add_program()).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        text,
        "\
.method m0 add(Integer, Integer): Integer
    ldarg 0
    ldarg 1
    add.i
    ret
    nop
    ret

.method m1 main(): Void .entry
    push.i 2
    push.i 3
    call m0 2
    sys.itos
    sys.println
    nop
    ret

"
    );
}

#[test]
fn missing_main_is_the_only_finding() {
    let mut session = CompilationSession::new(SessionConfig::default());
    let mut program = Program::new(vec![add_fn()]);
    assert!(session.compile(&mut program).is_none());

    let findings: Vec<_> = session.diagnostics().iter().collect();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].code, ErrorCode::E2008);
    assert_eq!(findings[0].span, None);
}

#[test]
fn duplicate_function_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dup.qbc");

    let mut program = add_program();
    program.functions.push(add_fn());
    let mut session =
        CompilationSession::new(SessionConfig::writing_to(&path, OutputFormat::Bytecode));
    assert!(session.compile(&mut program).is_none());

    assert_eq!(session.diagnostics().count(ErrorCode::E2007), 1);
    assert!(!path.exists());
}
