//! Statement lowering and control-flow labeling.

use quill_ir::{AssignTarget, Block, Expr, Stmt, StmtKind};
use quill_types::Type;
use rustc_hash::FxHashMap;

use super::{FunctionLowerer, ValueUse};
use crate::{Instr, LowerError};

impl FunctionLowerer<'_> {
    pub(super) fn lower_stmts(&mut self, stmts: &[Stmt]) -> Result<(), LowerError> {
        for stmt in stmts {
            self.lower_stmt(stmt)?;
        }
        Ok(())
    }

    /// Lower a nested block with its own name scope.
    fn lower_block(&mut self, block: &Block) -> Result<(), LowerError> {
        self.scopes.push(FxHashMap::default());
        let result = self.lower_stmts(&block.stmts);
        self.scopes.pop();
        result
    }

    fn lower_stmt(&mut self, stmt: &Stmt) -> Result<(), LowerError> {
        match &stmt.kind {
            StmtKind::Expr(expr) => self.lower_expr(expr, ValueUse::Discarded),

            StmtKind::Decl { name, ty, init } => {
                // Lower the initializer before the name is visible, so
                // `let x = x` in an inner block reads the outer `x`.
                if let Some(init) = init {
                    self.lower_as(init, *ty)?;
                }
                let slot = self.declare_local(name, *ty)?;
                if init.is_some() {
                    self.builder.emit(Instr::StoreLocal(slot));
                }
                Ok(())
            }

            StmtKind::Assign { target, value } => self.lower_assign(target, value),

            // cond; BranchIfTrue body; else; Jump end; body: then; end:
            StmtKind::If {
                cond,
                then_body,
                else_body,
            } => {
                let body = self.builder.new_label();
                let end = self.builder.new_label();
                self.lower_as(cond, Type::Boolean)?;
                self.builder.emit(Instr::BranchIfTrue(body));
                if let Some(else_body) = else_body {
                    self.lower_block(else_body)?;
                }
                self.builder.emit(Instr::Jump(end));
                self.builder.mark_label(body);
                self.lower_block(then_body)?;
                self.builder.mark_label(end);
                Ok(())
            }

            // cond: cond; BranchIfTrue body; Jump end; body: body; Jump cond; end:
            StmtKind::While { cond, body } => {
                let cond_label = self.builder.new_label();
                let body_label = self.builder.new_label();
                let end = self.builder.new_label();
                self.builder.mark_label(cond_label);
                self.lower_as(cond, Type::Boolean)?;
                self.builder.emit(Instr::BranchIfTrue(body_label));
                self.builder.emit(Instr::Jump(end));
                self.builder.mark_label(body_label);
                self.lower_block(body)?;
                self.builder.emit(Instr::Jump(cond_label));
                self.builder.mark_label(end);
                Ok(())
            }

            // body: body; cond: cond; BranchIfTrue body; end:
            StmtKind::DoWhile { body, cond } => {
                let body_label = self.builder.new_label();
                let cond_label = self.builder.new_label();
                let end = self.builder.new_label();
                self.builder.mark_label(body_label);
                self.lower_block(body)?;
                self.builder.mark_label(cond_label);
                self.lower_as(cond, Type::Boolean)?;
                self.builder.emit(Instr::BranchIfTrue(body_label));
                self.builder.mark_label(end);
                Ok(())
            }

            StmtKind::Return(value) => {
                if let Some(value) = value {
                    if self.return_type.is_value() {
                        self.lower_as(value, self.return_type)?;
                    } else {
                        self.lower_expr(value, ValueUse::Discarded)?;
                    }
                }
                self.builder.emit(Instr::Return);
                Ok(())
            }

            StmtKind::Block(block) => self.lower_block(block),
        }
    }

    fn lower_assign(&mut self, target: &AssignTarget, value: &Expr) -> Result<(), LowerError> {
        match target {
            AssignTarget::Ident { name, .. } => {
                let (slot, ty) = self.resolve(name)?;
                self.lower_as(value, ty)?;
                self.store(slot);
            }
            AssignTarget::Element { array, indices, .. } => {
                let (slot, ty) = self.resolve(array)?;
                let Type::Array(at) = ty else {
                    return Err(LowerError::unsupported("element assignment", ty));
                };
                if usize::from(at.rank) != indices.len() {
                    return Err(LowerError::Malformed(format!(
                        "`{array}` has rank {} but {} indices were given",
                        at.rank,
                        indices.len()
                    )));
                }
                self.load(slot);
                for index in indices {
                    self.lower_as(index, Type::Integer)?;
                }
                self.lower_as(value, at.element.to_type())?;
                self.builder.emit(if at.rank == 1 {
                    Instr::StoreElem
                } else {
                    Instr::ArraySet { rank: at.rank }
                });
            }
        }
        Ok(())
    }
}
