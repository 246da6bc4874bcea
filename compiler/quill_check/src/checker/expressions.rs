//! Expression typing. Every visited expression gets its `ty` set.

use quill_diagnostic::{
    arg_count_mismatch, invalid_index, invalid_operand, invalid_operands, type_mismatch,
    uninitialized_use, unknown_function, unknown_identifier,
};
use quill_ir::{ensure_sufficient_stack, Expr, ExprKind, Span};
use quill_symbols::ScopeId;
use quill_types::{ArrayType, Type};

use super::Checker;
use crate::operators::{binary_result, builtin_accepts, compare_result, logic_result};

impl Checker<'_> {
    /// Type `expr`, store the result in `expr.ty` and return it.
    pub(super) fn check_expr(&mut self, expr: &mut Expr, scope: ScopeId) -> Type {
        let ty = ensure_sufficient_stack(|| self.infer_expr(expr, scope));
        expr.ty = ty;
        ty
    }

    fn infer_expr(&mut self, expr: &mut Expr, scope: ScopeId) -> Type {
        let span = expr.span;
        match &mut expr.kind {
            ExprKind::Literal(lit) => lit.ty(),

            ExprKind::Ident(name) => self.read_identifier(name, span, scope),

            ExprKind::Binary { op, lhs, rhs } => {
                let (l, r) = (self.check_expr(lhs, scope), self.check_expr(rhs, scope));
                if l == Type::Undefined || r == Type::Undefined {
                    return Type::Undefined;
                }
                binary_result(*op, l, r)
                    .unwrap_or_else(|| self.operand_mismatch(span, op.as_symbol(), l, r))
            }

            ExprKind::Compare { op, lhs, rhs } => {
                let (l, r) = (self.check_expr(lhs, scope), self.check_expr(rhs, scope));
                if l == Type::Undefined || r == Type::Undefined {
                    return Type::Boolean;
                }
                compare_result(*op, l, r)
                    .unwrap_or_else(|| self.operand_mismatch(span, op.as_symbol(), l, r))
            }

            ExprKind::Logic { op, lhs, rhs } => {
                let (l, r) = (self.check_expr(lhs, scope), self.check_expr(rhs, scope));
                if l == Type::Undefined || r == Type::Undefined {
                    return Type::Boolean;
                }
                logic_result(l, r)
                    .unwrap_or_else(|| self.operand_mismatch(span, op.as_symbol(), l, r))
            }

            ExprKind::Not(operand) => {
                let ty = self.check_expr(operand, scope);
                match ty {
                    Type::Boolean | Type::Undefined => Type::Boolean,
                    other => {
                        self.report(invalid_operand(span, "not", &other.to_string()));
                        Type::Undefined
                    }
                }
            }

            ExprKind::Index { array, indices } => {
                self.check_element_access(array, indices, span, scope)
            }

            ExprKind::Call { name, args } => self.check_call(name, args, span, scope),

            ExprKind::NewArray { element, dims } => {
                let element = *element;
                self.check_indices(dims, "array dimensions", scope);
                match u8::try_from(dims.len()) {
                    Ok(rank) if rank > 0 => Type::Array(ArrayType::new(element, rank)),
                    _ => {
                        let found = dims.len();
                        self.report(invalid_index(
                            span,
                            format!("an array needs between 1 and 255 dimensions, found {found}"),
                        ));
                        Type::Undefined
                    }
                }
            }
        }
    }

    fn operand_mismatch(&mut self, span: Span, op: &str, lhs: Type, rhs: Type) -> Type {
        self.report(invalid_operands(span, op, &lhs.to_string(), &rhs.to_string()));
        Type::Undefined
    }

    /// Resolve a variable read and check it is definitely assigned here.
    fn read_identifier(&mut self, name: &str, span: Span, scope: ScopeId) -> Type {
        let Some(ident) = self.symbols.resolve_identifier(scope, name) else {
            self.report(unknown_identifier(span, name));
            return Type::Undefined;
        };
        let (id, ty) = (ident.id, ident.ty);
        if !self.symbols.is_initialized_along(id, scope) {
            self.report(uninitialized_use(span, name));
        }
        ty
    }

    /// `array[i, ...]` as a read or as an assignment target. Returns the
    /// element type (`String` for a character of a string).
    pub(super) fn check_element_access(
        &mut self,
        array: &str,
        indices: &mut [Expr],
        span: Span,
        scope: ScopeId,
    ) -> Type {
        let base = self.read_identifier(array, span, scope);
        self.check_indices(indices, "index", scope);
        match base {
            Type::Undefined => Type::Undefined,
            Type::Array(at) if usize::from(at.rank) == indices.len() => at.element.to_type(),
            Type::Array(at) => {
                self.report(invalid_index(
                    span,
                    format!(
                        "`{array}` has rank {}, but {} index expression{} given",
                        at.rank,
                        indices.len(),
                        if indices.len() == 1 { " was" } else { "s were" }
                    ),
                ));
                Type::Undefined
            }
            Type::String if indices.len() == 1 => Type::String,
            other => {
                self.report(invalid_index(
                    span,
                    format!("`{array}` of type `{other}` cannot be indexed this way"),
                ));
                Type::Undefined
            }
        }
    }

    /// Every index (or dimension) must be an Integer.
    fn check_indices(&mut self, indices: &mut [Expr], what: &str, scope: ScopeId) {
        for index in indices {
            let ty = self.check_expr(index, scope);
            if !matches!(ty, Type::Integer | Type::Undefined) {
                self.report(invalid_index(
                    index.span,
                    format!("{what} must be `Integer`, found `{ty}`"),
                ));
            }
        }
    }

    fn check_call(&mut self, name: &str, args: &mut [Expr], span: Span, scope: ScopeId) -> Type {
        for arg in args.iter_mut() {
            self.check_expr(arg, scope);
        }

        let Some(function) = self.symbols.resolve_function(scope, name, args.len()) else {
            if self.symbols.has_function_named(scope, name) {
                self.report(arg_count_mismatch(span, name, args.len()));
            } else {
                self.report(unknown_function(span, name));
            }
            return Type::Undefined;
        };
        let params: Vec<Type> = function.argument_types().collect();
        let return_type = function.return_type;
        let is_builtin = function.is_builtin;

        for (i, (arg, param)) in args.iter().zip(params).enumerate() {
            if !arg.ty.assignable_to(param) {
                self.report(type_mismatch(
                    arg.span,
                    &param.to_string(),
                    &arg.ty.to_string(),
                    &format!("argument {} of `{name}`", i + 1),
                ));
            } else if is_builtin && arg.ty.is_value() && !builtin_accepts(name, arg.ty) {
                self.report(invalid_operand(arg.span, name, &arg.ty.to_string()));
            }
        }
        return_type
    }
}
