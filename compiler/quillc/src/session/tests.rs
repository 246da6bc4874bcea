use pretty_assertions::assert_eq;
use quill_diagnostic::{Diagnostic, ErrorCode};
use quill_ir::{BinaryOp, Block, Expr, FunctionDecl, Param, Program, Stmt};
use quill_types::Type;

use super::*;

fn main_fn(stmts: Vec<Stmt>) -> FunctionDecl {
    FunctionDecl::new("main", Vec::new(), Type::Void, Block::new(stmts))
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

fn codes(session: &CompilationSession) -> Vec<ErrorCode> {
    session.diagnostics().iter().map(|d| d.code).collect()
}

#[test]
fn valid_program_compiles_in_memory() {
    let mut session = CompilationSession::new(SessionConfig::default());
    let mut program = Program::new(vec![add_fn(), main_fn(Vec::new())]);
    let lowered = session.compile(&mut program).unwrap();
    assert!(session.diagnostics().is_empty());
    assert!(lowered.entry_method().is_some());
    assert!(lowered.find_method("add", 2).is_some());

    let symbols = session.symbols();
    assert!(symbols.resolve_function(symbols.root(), "add", 2).is_some());
}

#[test]
fn missing_entry_is_reported_once_without_span() {
    let mut session = CompilationSession::new(SessionConfig::default());
    let mut program = Program::new(vec![add_fn()]);
    assert!(session.compile(&mut program).is_none());
    assert_eq!(codes(&session), vec![ErrorCode::E2008]);
    let diagnostic = session.diagnostics().iter().next().unwrap();
    assert_eq!(diagnostic.span, None);
}

#[test]
fn duplicate_function_stops_before_lowering() {
    let mut session = CompilationSession::new(SessionConfig::default());
    let mut program = Program::new(vec![add_fn(), add_fn(), main_fn(Vec::new())]);
    assert!(session.compile(&mut program).is_none());
    assert_eq!(codes(&session), vec![ErrorCode::E2007]);
}

#[test]
fn each_compile_starts_fresh() {
    let mut session = CompilationSession::new(SessionConfig::default());

    let mut broken = Program::new(vec![add_fn()]);
    assert!(session.compile(&mut broken).is_none());
    assert_eq!(session.diagnostics().len(), 1);

    // `add` was declared by the first run; a stale table would reject it.
    let mut fixed = Program::new(vec![add_fn(), main_fn(Vec::new())]);
    assert!(session.compile(&mut fixed).is_some());
    assert!(session.diagnostics().is_empty());
}

#[test]
fn source_path_is_attached_to_findings() {
    let config = SessionConfig::default().with_source_path("prog.quill");
    let mut session = CompilationSession::new(config);
    let mut program = Program::new(vec![add_fn()]);
    assert!(session.compile(&mut program).is_none());

    assert_eq!(program.source.as_deref(), Some(std::path::Path::new("prog.quill")));
    let diagnostic = session.diagnostics().iter().next().unwrap();
    assert_eq!(
        diagnostic.file.as_deref(),
        Some(std::path::Path::new("prog.quill"))
    );
}

#[test]
fn render_forwards_all_findings() {
    let mut session = CompilationSession::new(SessionConfig::default());
    let mut program = Program::new(vec![add_fn(), add_fn()]);
    assert!(session.compile(&mut program).is_none());

    let mut rendered: Vec<Diagnostic> = Vec::new();
    session.render_diagnostics(&mut rendered);
    let rendered: Vec<_> = rendered.iter().map(|d| d.code).collect();
    assert_eq!(rendered, vec![ErrorCode::E2007, ErrorCode::E2008]);
}

#[test]
fn unwritable_output_is_a_persistence_failure() {
    let dir = tempfile::tempdir().unwrap();
    let config = SessionConfig::writing_to(
        dir.path().join("missing").join("out.qbc"),
        OutputFormat::Bytecode,
    );
    let mut session = CompilationSession::new(config);
    let mut program = Program::new(vec![main_fn(Vec::new())]);
    assert!(session.compile(&mut program).is_none());
    assert_eq!(codes(&session), vec![ErrorCode::E5002]);
}
