//! Expression lowering.
//!
//! Operands are always evaluated left then right. Booleans are materialized
//! as 0/1 through a branch over three labels.

use quill_ir::{ensure_sufficient_stack, BinaryOp, CompareOp, Expr, ExprKind, Literal, LogicOp};
use quill_types::{Numeric, Type};
use smallvec::SmallVec;

use super::{FunctionLowerer, ValueUse};
use crate::{intrinsics, ArithOp, Cond, Instr, Intrinsic, Label, LowerError};

impl FunctionLowerer<'_> {
    /// Lower `expr`. A discarded value is popped; a consumed expression must
    /// produce one.
    pub(super) fn lower_expr(&mut self, expr: &Expr, usage: ValueUse) -> Result<(), LowerError> {
        let pushed = ensure_sufficient_stack(|| self.lower_value(expr))?;
        match (usage, pushed) {
            (ValueUse::Discarded, true) => self.builder.emit(Instr::Pop),
            (ValueUse::Consumed, false) => {
                return Err(LowerError::Malformed(
                    "expression without a value used as an operand".to_owned(),
                ));
            }
            _ => {}
        }
        Ok(())
    }

    /// Lower `expr` as an operand of type `target`, widening an Integer to
    /// Float when the target needs it.
    pub(super) fn lower_as(&mut self, expr: &Expr, target: Type) -> Result<(), LowerError> {
        self.lower_expr(expr, ValueUse::Consumed)?;
        if expr.ty == Type::Integer && target == Type::Float {
            self.builder.emit(Instr::IntToFloat);
        }
        Ok(())
    }

    /// Returns whether a value was left on the stack.
    fn lower_value(&mut self, expr: &Expr) -> Result<bool, LowerError> {
        match &expr.kind {
            ExprKind::Literal(lit) => {
                self.lower_literal(lit);
                Ok(true)
            }

            ExprKind::Ident(name) => {
                let (slot, _) = self.resolve(name)?;
                self.load(slot);
                Ok(true)
            }

            ExprKind::Binary { op, lhs, rhs } => {
                self.lower_binary(*op, lhs, rhs, expr.ty)?;
                Ok(true)
            }

            ExprKind::Compare { op, lhs, rhs } => {
                self.lower_compare(*op, lhs, rhs)?;
                Ok(true)
            }

            ExprKind::Logic { op, lhs, rhs } => {
                self.lower_as(lhs, Type::Boolean)?;
                self.lower_as(rhs, Type::Boolean)?;
                // On 0/1 operands, `and` is a product and `or` a non-zero sum.
                let op = match op {
                    LogicOp::And => ArithOp::Mul,
                    LogicOp::Or => ArithOp::Add,
                };
                self.builder.emit(Instr::Arith {
                    op,
                    ty: Numeric::Integer,
                });
                self.materialize_bool(Instr::BranchIfTrue, 1);
                Ok(true)
            }

            ExprKind::Not(operand) => {
                self.lower_as(operand, Type::Boolean)?;
                self.materialize_bool(Instr::BranchIfTrue, 0);
                Ok(true)
            }

            ExprKind::Index { array, indices } => {
                self.lower_element_read(array, indices)?;
                Ok(true)
            }

            ExprKind::Call { name, args } => self.lower_call(name, args),

            ExprKind::NewArray { element, dims } => {
                for dim in dims {
                    self.lower_as(dim, Type::Integer)?;
                }
                let rank = u8::try_from(dims.len())
                    .ok()
                    .filter(|&rank| rank > 0)
                    .ok_or_else(|| {
                        LowerError::Malformed(format!("array of rank {}", dims.len()))
                    })?;
                self.builder.emit(Instr::NewArray {
                    element: *element,
                    rank,
                });
                Ok(true)
            }
        }
    }

    fn lower_literal(&mut self, lit: &Literal) {
        let instr = match lit {
            Literal::Integer(value) => Instr::PushInt(*value),
            Literal::Float(value) => Instr::push_float(*value),
            Literal::Boolean(value) => Instr::PushInt(i64::from(*value)),
            Literal::String(text) => Instr::PushStr(self.emitter.intern(text)),
        };
        self.builder.emit(instr);
    }

    fn lower_binary(
        &mut self,
        op: BinaryOp,
        lhs: &Expr,
        rhs: &Expr,
        result: Type,
    ) -> Result<(), LowerError> {
        if result == Type::String && op == BinaryOp::Add {
            self.lower_as(lhs, Type::String)?;
            self.lower_as(rhs, Type::String)?;
            self.builder.emit(Instr::Concat);
            return Ok(());
        }
        let ty = result
            .numeric()
            .ok_or_else(|| LowerError::unsupported(op.as_symbol(), result))?;
        self.lower_as(lhs, result)?;
        self.lower_as(rhs, result)?;
        let op = match op {
            BinaryOp::Add => ArithOp::Add,
            BinaryOp::Sub => ArithOp::Sub,
            BinaryOp::Mul => ArithOp::Mul,
            BinaryOp::Div => ArithOp::Div,
        };
        self.builder.emit(Instr::Arith { op, ty });
        Ok(())
    }

    fn lower_compare(&mut self, op: CompareOp, lhs: &Expr, rhs: &Expr) -> Result<(), LowerError> {
        let cond = Cond::from(op);
        match (lhs.ty.numeric(), rhs.ty.numeric()) {
            (Some(l), Some(r)) => {
                let ty = Numeric::widest(l, r);
                self.lower_as(lhs, ty.to_type())?;
                self.lower_as(rhs, ty.to_type())?;
                self.materialize_bool(|target| Instr::BranchCmp { cond, ty, target }, 1);
            }
            _ if lhs.ty == Type::String && rhs.ty == Type::String && op.is_equality() => {
                self.lower_as(lhs, Type::String)?;
                self.lower_as(rhs, Type::String)?;
                // StrEq leaves 1 for equal contents; compare that against 1.
                self.builder.emit(Instr::StrEq);
                self.builder.emit(Instr::PushInt(1));
                self.materialize_bool(
                    |target| Instr::BranchCmp {
                        cond,
                        ty: Numeric::Integer,
                        target,
                    },
                    1,
                );
            }
            _ if lhs.ty == Type::Boolean && rhs.ty == Type::Boolean && op.is_equality() => {
                self.lower_as(lhs, Type::Boolean)?;
                self.lower_as(rhs, Type::Boolean)?;
                self.materialize_bool(
                    |target| Instr::BranchCmp {
                        cond,
                        ty: Numeric::Integer,
                        target,
                    },
                    1,
                );
            }
            _ => return Err(LowerError::unsupported(op.as_symbol(), lhs.ty)),
        }
        Ok(())
    }

    /// Emit `branch` and leave `when_taken` on the stack if it jumps, the
    /// other of 0/1 otherwise.
    fn materialize_bool(&mut self, branch: impl FnOnce(Label) -> Instr, when_taken: i64) {
        let taken = self.builder.new_label();
        let not_taken = self.builder.new_label();
        let end = self.builder.new_label();

        self.builder.emit(branch(taken));
        self.builder.mark_label(not_taken);
        self.builder.emit(Instr::PushInt(1 - when_taken));
        self.builder.emit(Instr::Jump(end));
        self.builder.mark_label(taken);
        self.builder.emit(Instr::PushInt(when_taken));
        self.builder.mark_label(end);
    }

    fn lower_element_read(&mut self, array: &str, indices: &[Expr]) -> Result<(), LowerError> {
        let (slot, ty) = self.resolve(array)?;
        self.load(slot);
        for index in indices {
            self.lower_as(index, Type::Integer)?;
        }
        match ty {
            Type::String if indices.len() == 1 => {
                self.builder.emit(Instr::Intrinsic(Intrinsic::CharAt));
            }
            Type::Array(at) if usize::from(at.rank) == indices.len() => {
                self.builder.emit(if at.rank == 1 {
                    Instr::LoadElem
                } else {
                    Instr::ArrayGet { rank: at.rank }
                });
            }
            other => return Err(LowerError::unsupported("[]", other)),
        }
        Ok(())
    }

    /// User methods first, then externals, then built-in templates.
    fn lower_call(&mut self, name: &str, args: &[Expr]) -> Result<bool, LowerError> {
        let signature = (name.to_owned(), args.len());

        if let Some(&method) = self.emitter.methods.get(&signature) {
            let callee = &self.emitter.program.methods[method.index()];
            let (params, returns) = (callee.params.clone(), callee.returns_value());
            self.lower_args(args, &params)?;
            if let Some(&host) = self.emitter.externals.get(&signature) {
                self.builder.emit(Instr::CallHost(host));
            } else {
                let argc = u16::try_from(args.len()).map_err(|_| {
                    LowerError::Malformed(format!("too many arguments to `{name}`"))
                })?;
                self.builder.emit(Instr::Call { method, argc });
            }
            return Ok(returns);
        }

        let types: SmallVec<[Type; 4]> = args.iter().map(|arg| arg.ty).collect();
        let Some(template) = intrinsics::template(name, &types) else {
            return Err(LowerError::UnresolvedFunction {
                name: name.to_owned(),
                arity: args.len(),
            });
        };
        let template = template?;
        for arg in args {
            self.lower_expr(arg, ValueUse::Consumed)?;
        }
        for instr in template {
            self.builder.emit(instr);
        }
        Ok(intrinsics::returns_value(name))
    }

    fn lower_args(&mut self, args: &[Expr], params: &[Type]) -> Result<(), LowerError> {
        for (arg, &param) in args.iter().zip(params) {
            self.lower_as(arg, param)?;
        }
        Ok(())
    }
}
