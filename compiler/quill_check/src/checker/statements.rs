//! Statement checking, definite assignment and return-path analysis.

use quill_diagnostic::{
    duplicate_identifier, invalid_condition, invalid_operand, invalid_variable_type,
    type_mismatch, unknown_identifier,
};
use quill_ir::{AssignTarget, Block, Expr, Span, Stmt, StmtKind};
use quill_symbols::ScopeId;
use quill_types::Type;

use super::{Checker, FnContext};

impl Checker<'_> {
    /// Check `stmts` in `scope`. Returns whether every path through them
    /// returns.
    pub(super) fn check_stmts(
        &mut self,
        stmts: &mut [Stmt],
        scope: ScopeId,
        ctx: &FnContext<'_>,
    ) -> bool {
        let mut returns = false;
        for stmt in stmts {
            returns |= self.check_stmt(stmt, scope, ctx);
        }
        returns
    }

    /// Check a nested block in a fresh child scope. Returns the child scope
    /// and whether the block always returns.
    fn check_block(
        &mut self,
        block: &mut Block,
        parent: ScopeId,
        ctx: &FnContext<'_>,
    ) -> (ScopeId, bool) {
        let scope = self.symbols.create_child(parent);
        let returns = self.check_stmts(&mut block.stmts, scope, ctx);
        (scope, returns)
    }

    fn check_stmt(&mut self, stmt: &mut Stmt, scope: ScopeId, ctx: &FnContext<'_>) -> bool {
        let span = stmt.span;
        match &mut stmt.kind {
            StmtKind::Expr(expr) => {
                self.check_expr(expr, scope);
                false
            }

            StmtKind::Decl { name, ty, init } => {
                let ty = *ty;
                if !ty.is_valid_variable_type() {
                    self.report(invalid_variable_type(span, name, &ty.to_string()));
                }
                if let Some(init) = init.as_mut() {
                    self.check_expr(init, scope);
                }
                match self.symbols.try_declare_identifier(scope, name, ty) {
                    Some(id) => {
                        if let Some(init) = init {
                            if ty.is_valid_variable_type() {
                                self.expect_assignable(init, ty, "initializer");
                            }
                            self.symbols.mark_assigned(id, scope);
                        }
                    }
                    None => self.report(duplicate_identifier(span, name)),
                }
                false
            }

            StmtKind::Assign { target, value } => {
                self.check_expr(value, scope);
                self.check_assign_target(target, value, scope);
                false
            }

            StmtKind::If {
                cond,
                then_body,
                else_body,
            } => {
                self.check_condition(cond, scope);
                let (then_scope, then_returns) = self.check_block(then_body, scope, ctx);
                let Some(else_body) = else_body else {
                    return false;
                };
                let (else_scope, else_returns) = self.check_block(else_body, scope, ctx);

                let in_else = self.symbols.initialized_in_block(else_scope);
                for id in self.symbols.initialized_in_block(then_scope) {
                    if in_else.contains(&id) {
                        self.symbols.mark_assigned(id, scope);
                    }
                }
                then_returns && else_returns
            }

            StmtKind::While { cond, body } => {
                self.check_condition(cond, scope);
                // The body may run zero times: nothing it assigns escapes.
                self.check_block(body, scope, ctx);
                false
            }

            StmtKind::DoWhile { body, cond } => {
                let (body_scope, returns) = self.check_block(body, scope, ctx);
                self.promote_initialized(body_scope, scope);
                self.check_condition(cond, scope);
                returns
            }

            StmtKind::Return(value) => {
                self.check_return(value.as_mut(), span, scope, ctx);
                true
            }

            StmtKind::Block(block) => {
                let (inner, returns) = self.check_block(block, scope, ctx);
                self.promote_initialized(inner, scope);
                returns
            }
        }
    }

    fn check_assign_target(&mut self, target: &mut AssignTarget, value: &Expr, scope: ScopeId) {
        match target {
            AssignTarget::Ident { name, span } => {
                let Some(ident) = self.symbols.resolve_identifier(scope, name) else {
                    self.report(unknown_identifier(*span, name));
                    return;
                };
                let (id, ty) = (ident.id, ident.ty);
                self.expect_assignable(value, ty, "assignment");
                self.symbols.mark_assigned(id, scope);
            }
            AssignTarget::Element {
                array,
                indices,
                span,
            } => {
                let element = self.check_element_access(array, indices, *span, scope);
                let base = self.symbols.resolve_identifier(scope, array).map(|i| i.ty);
                if base == Some(Type::String) {
                    self.report(invalid_operand(*span, "element assignment", "String"));
                    return;
                }
                self.expect_assignable(value, element, "element assignment");
            }
        }
    }

    fn check_return(
        &mut self,
        value: Option<&mut Expr>,
        span: Span,
        scope: ScopeId,
        ctx: &FnContext<'_>,
    ) {
        let context = format!("return value of `{}`", ctx.name);
        match value {
            Some(value) => {
                self.check_expr(value, scope);
                if ctx.return_type == Type::Void {
                    if value.ty.is_value() {
                        self.report(type_mismatch(
                            value.span,
                            "Void",
                            &value.ty.to_string(),
                            &context,
                        ));
                    }
                } else {
                    self.expect_assignable(value, ctx.return_type, &context);
                }
            }
            None if ctx.return_type != Type::Void => {
                self.report(type_mismatch(
                    span,
                    &ctx.return_type.to_string(),
                    "Void",
                    &context,
                ));
            }
            None => {}
        }
    }

    fn check_condition(&mut self, cond: &mut Expr, scope: ScopeId) {
        let ty = self.check_expr(cond, scope);
        if !matches!(ty, Type::Boolean | Type::Undefined) {
            self.report(invalid_condition(cond.span, &ty.to_string()));
        }
    }

    /// Report a mismatch if `value`'s annotated type cannot be stored as
    /// `target`.
    pub(super) fn expect_assignable(&mut self, value: &Expr, target: Type, context: &str) {
        if target == Type::Undefined || value.ty.assignable_to(target) {
            return;
        }
        self.report(type_mismatch(
            value.span,
            &target.to_string(),
            &value.ty.to_string(),
            context,
        ));
    }
}
