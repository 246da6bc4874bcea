//! Annotated syntax tree.
//!
//! The front end builds these nodes with every expression's `ty` set to
//! [`Type::Undefined`]; the checker fills in the resolved type. The emitter
//! trusts the annotations it finds.
//!
//! Constructors are provided for each node so callers (and tests) can build
//! programs without a parser:
//!
//! ```text
//! let sum = Expr::binary(BinaryOp::Add, Expr::ident("a"), Expr::ident("b"));
//! FunctionDecl::new(
//!     "add",
//!     vec![Param::new("a", Type::Integer), Param::new("b", Type::Integer)],
//!     Type::Integer,
//!     Block::new(vec![Stmt::ret(Some(sum))]),
//! )
//! ```

use std::fmt;
use std::path::PathBuf;

use quill_types::{ElementType, Type};

use crate::Span;

/// A whole compilation unit.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Program {
    pub functions: Vec<FunctionDecl>,
    /// Path of the source file, used when rendering diagnostics.
    pub source: Option<PathBuf>,
}

impl Program {
    pub fn new(functions: Vec<FunctionDecl>) -> Self {
        Program {
            functions,
            source: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }
}

/// A function declaration.
///
/// External functions have `external = Some(package)` and an empty body;
/// calls to them are bound to the host routine `package.name`.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Type,
    pub body: Block,
    pub external: Option<String>,
    pub span: Span,
}

impl FunctionDecl {
    pub fn new(
        name: impl Into<String>,
        params: Vec<Param>,
        return_type: Type,
        body: Block,
    ) -> Self {
        FunctionDecl {
            name: name.into(),
            params,
            return_type,
            body,
            external: None,
            span: Span::DUMMY,
        }
    }

    /// Declare a function whose body lives in the host package `package`.
    pub fn external(
        name: impl Into<String>,
        params: Vec<Param>,
        return_type: Type,
        package: impl Into<String>,
    ) -> Self {
        FunctionDecl {
            name: name.into(),
            params,
            return_type,
            body: Block::default(),
            external: Some(package.into()),
            span: Span::DUMMY,
        }
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    #[inline]
    pub fn is_external(&self) -> bool {
        self.external.is_some()
    }
}

/// A formal parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: Type,
    pub span: Span,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Param {
            name: name.into(),
            ty,
            span: Span::DUMMY,
        }
    }
}

/// A braced statement list. Each block is its own lexical scope and its
/// own control-flow block for definite-assignment tracking.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Block {
            stmts,
            span: Span::DUMMY,
        }
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    /// An expression evaluated for its effect; any value is discarded.
    Expr(Expr),
    /// `let name: ty [= init];`
    Decl {
        name: String,
        ty: Type,
        init: Option<Expr>,
    },
    Assign {
        target: AssignTarget,
        value: Expr,
    },
    If {
        cond: Expr,
        then_body: Block,
        else_body: Option<Block>,
    },
    While {
        cond: Expr,
        body: Block,
    },
    DoWhile {
        body: Block,
        cond: Expr,
    },
    Return(Option<Expr>),
    Block(Block),
}

/// Left-hand side of an assignment.
#[derive(Clone, Debug, PartialEq)]
pub enum AssignTarget {
    /// A plain variable or argument.
    Ident { name: String, span: Span },
    /// `array[i, j, ...]`
    Element {
        array: String,
        indices: Vec<Expr>,
        span: Span,
    },
}

impl AssignTarget {
    pub fn span(&self) -> Span {
        match self {
            AssignTarget::Ident { span, .. } | AssignTarget::Element { span, .. } => *span,
        }
    }

    /// Name of the variable being written.
    pub fn name(&self) -> &str {
        match self {
            AssignTarget::Ident { name, .. } => name,
            AssignTarget::Element { array, .. } => array,
        }
    }
}

impl Stmt {
    fn new(kind: StmtKind) -> Self {
        Stmt {
            kind,
            span: Span::DUMMY,
        }
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn expr(expr: Expr) -> Self {
        Self::new(StmtKind::Expr(expr))
    }

    pub fn decl(name: impl Into<String>, ty: Type, init: Option<Expr>) -> Self {
        Self::new(StmtKind::Decl {
            name: name.into(),
            ty,
            init,
        })
    }

    pub fn assign(name: impl Into<String>, value: Expr) -> Self {
        Self::new(StmtKind::Assign {
            target: AssignTarget::Ident {
                name: name.into(),
                span: Span::DUMMY,
            },
            value,
        })
    }

    pub fn assign_element(array: impl Into<String>, indices: Vec<Expr>, value: Expr) -> Self {
        Self::new(StmtKind::Assign {
            target: AssignTarget::Element {
                array: array.into(),
                indices,
                span: Span::DUMMY,
            },
            value,
        })
    }

    pub fn if_else(cond: Expr, then_body: Block, else_body: Option<Block>) -> Self {
        Self::new(StmtKind::If {
            cond,
            then_body,
            else_body,
        })
    }

    pub fn while_loop(cond: Expr, body: Block) -> Self {
        Self::new(StmtKind::While { cond, body })
    }

    pub fn do_while(body: Block, cond: Expr) -> Self {
        Self::new(StmtKind::DoWhile { body, cond })
    }

    pub fn ret(value: Option<Expr>) -> Self {
        Self::new(StmtKind::Return(value))
    }

    pub fn block(block: Block) -> Self {
        Self::new(StmtKind::Block(block))
    }
}

/// An expression annotated with its resolved type.
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: Type,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    Ident(String),
    /// `+ - * /`
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// `< > <= >= == !=`
    Compare {
        op: CompareOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// `and`, `or` (both operands are always evaluated)
    Logic {
        op: LogicOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Not(Box<Expr>),
    /// `array[i, j, ...]`, or `text[i]` on a string.
    Index { array: String, indices: Vec<Expr> },
    Call { name: String, args: Vec<Expr> },
    /// `new Element[d0, d1, ...]`
    NewArray {
        element: ElementType,
        dims: Vec<Expr>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    String(String),
    Boolean(bool),
}

impl Literal {
    pub fn ty(&self) -> Type {
        match self {
            Literal::Integer(_) => Type::Integer,
            Literal::Float(_) => Type::Float,
            Literal::String(_) => Type::String,
            Literal::Boolean(_) => Type::Boolean,
        }
    }
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Expr {
            kind,
            ty: Type::Undefined,
            span: Span::DUMMY,
        }
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Set the annotation directly, for trees that arrive pre-checked.
    #[must_use]
    pub fn with_type(mut self, ty: Type) -> Self {
        self.ty = ty;
        self
    }

    pub fn int(value: i64) -> Self {
        Self::new(ExprKind::Literal(Literal::Integer(value)))
    }

    pub fn float(value: f64) -> Self {
        Self::new(ExprKind::Literal(Literal::Float(value)))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(ExprKind::Literal(Literal::String(value.into())))
    }

    pub fn boolean(value: bool) -> Self {
        Self::new(ExprKind::Literal(Literal::Boolean(value)))
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Self::new(ExprKind::Ident(name.into()))
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Self::new(ExprKind::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    pub fn compare(op: CompareOp, lhs: Expr, rhs: Expr) -> Self {
        Self::new(ExprKind::Compare {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    pub fn logic(op: LogicOp, lhs: Expr, rhs: Expr) -> Self {
        Self::new(ExprKind::Logic {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    pub fn not(operand: Expr) -> Self {
        Self::new(ExprKind::Not(Box::new(operand)))
    }

    pub fn index(array: impl Into<String>, indices: Vec<Expr>) -> Self {
        Self::new(ExprKind::Index {
            array: array.into(),
            indices,
        })
    }

    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::new(ExprKind::Call {
            name: name.into(),
            args,
        })
    }

    pub fn new_array(element: ElementType, dims: Vec<Expr>) -> Self {
        Self::new(ExprKind::NewArray { element, dims })
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum CompareOp {
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
}

impl CompareOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
            CompareOp::Le => "<=",
            CompareOp::Ge => ">=",
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
        }
    }

    /// `==` and `!=` apply to every value type; the rest need numbers.
    #[inline]
    pub fn is_equality(self) -> bool {
        matches!(self, CompareOp::Eq | CompareOp::Ne)
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum LogicOp {
    And,
    Or,
}

impl LogicOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            LogicOp::And => "and",
            LogicOp::Or => "or",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

impl fmt::Display for LogicOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}
