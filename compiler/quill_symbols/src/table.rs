//! The scope arena and its declaration/resolution operations.

use std::iter;

use quill_types::Type;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::builtins::BUILTINS;
use crate::symbol::{
    Argument, Function, FunctionId, IdentId, Identifier, Initialization, Scope, ScopeId,
};

/// Every scope, identifier and function of one compilation.
///
/// Scopes are never removed; a fresh table is created for each run. All
/// lookups return `Option` and never panic for names. The `ScopeId`,
/// `IdentId` and `FunctionId` accessors index the arena directly and expect
/// ids handed out by this table.
#[derive(Clone, Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    identifiers: Vec<Identifier>,
    functions: Vec<Function>,
    builtins: FxHashMap<String, SmallVec<[FunctionId; 2]>>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// A table holding only the root scope (level 1) and the built-ins.
    pub fn new() -> Self {
        let mut table = SymbolTable {
            scopes: vec![Scope {
                level: 1,
                ..Scope::default()
            }],
            identifiers: Vec::new(),
            functions: Vec::new(),
            builtins: FxHashMap::default(),
        };
        for &(name, params, return_type) in BUILTINS {
            let arguments = params
                .iter()
                .enumerate()
                .map(|(i, &(arg, ty))| Argument::new(arg, ty, i + 1))
                .collect();
            let id = table.push_function(name, return_type, arguments, 1, true);
            table.builtins.entry(name.to_string()).or_default().push(id);
        }
        table
    }

    #[inline]
    pub fn root(&self) -> ScopeId {
        ScopeId::new(0)
    }

    /// Open a scope nested in `parent` (level + 1).
    pub fn create_child(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId::new(
            u32::try_from(self.scopes.len())
                .unwrap_or_else(|_| panic!("scope count exceeds u32::MAX")),
        );
        let level = self.scopes[parent.index()].level + 1;
        self.scopes.push(Scope {
            parent: Some(parent),
            level,
            ..Scope::default()
        });
        self.scopes[parent.index()].children.push(id);
        id
    }

    // ── Accessors ───────────────────────────────────────────────────

    #[inline]
    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    #[inline]
    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.scope(id).parent
    }

    #[inline]
    pub fn children(&self, id: ScopeId) -> &[ScopeId] {
        &self.scope(id).children
    }

    #[inline]
    pub fn level(&self, id: ScopeId) -> u32 {
        self.scope(id).level
    }

    #[inline]
    pub fn identifier(&self, id: IdentId) -> &Identifier {
        &self.identifiers[id.index()]
    }

    #[inline]
    pub fn function(&self, id: FunctionId) -> &Function {
        &self.functions[id.index()]
    }

    pub fn builtins(&self) -> impl Iterator<Item = &Function> {
        self.functions.iter().filter(|f| f.is_builtin)
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    /// `scope`, its parent, and so on up to the root.
    pub fn ancestors(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        iter::successors(Some(scope), move |&s| self.parent(s))
    }

    // ── Declaration ─────────────────────────────────────────────────

    /// Declare `name` in `scope`. Returns `false` if `scope` itself already
    /// declares it; names from enclosing scopes may be shadowed.
    pub fn declare_identifier(&mut self, scope: ScopeId, name: &str, ty: Type) -> bool {
        self.try_declare_identifier(scope, name, ty).is_some()
    }

    /// Like [`declare_identifier`](Self::declare_identifier) but returns the
    /// new identifier's id.
    pub fn try_declare_identifier(
        &mut self,
        scope: ScopeId,
        name: &str,
        ty: Type,
    ) -> Option<IdentId> {
        if self.scope(scope).identifiers.contains_key(name) {
            return None;
        }
        let id = IdentId::new(
            u32::try_from(self.identifiers.len())
                .unwrap_or_else(|_| panic!("identifier count exceeds u32::MAX")),
        );
        self.identifiers.push(Identifier {
            id,
            name: name.to_string(),
            ty,
            level: self.level(scope),
            scope,
            init: Initialization::default(),
        });
        self.scopes[scope.index()]
            .identifiers
            .insert(name.to_string(), id);
        Some(id)
    }

    /// Declare a function in `scope`. Returns `false` if a built-in or any
    /// scope from `scope` up to the root already has the same
    /// `(name, arity)`.
    pub fn declare_function(
        &mut self,
        scope: ScopeId,
        name: &str,
        return_type: Type,
        arguments: Vec<Argument>,
    ) -> bool {
        self.try_declare_function(scope, name, return_type, arguments)
            .is_some()
    }

    pub fn try_declare_function(
        &mut self,
        scope: ScopeId,
        name: &str,
        return_type: Type,
        arguments: Vec<Argument>,
    ) -> Option<FunctionId> {
        let arity = arguments.len();
        if self.builtin(name, arity).is_some()
            || self.resolve_user_function(scope, name, arity).is_some()
        {
            return None;
        }
        let level = self.level(scope);
        let id = self.push_function(name, return_type, arguments, level, false);
        self.scopes[scope.index()]
            .functions
            .entry(name.to_string())
            .or_default()
            .push(id);
        Some(id)
    }

    fn push_function(
        &mut self,
        name: &str,
        return_type: Type,
        arguments: Vec<Argument>,
        level: u32,
        is_builtin: bool,
    ) -> FunctionId {
        let id = FunctionId::new(
            u32::try_from(self.functions.len())
                .unwrap_or_else(|_| panic!("function count exceeds u32::MAX")),
        );
        self.functions.push(Function {
            id,
            name: name.to_string(),
            return_type,
            arguments,
            level,
            is_builtin,
        });
        id
    }

    // ── Resolution ──────────────────────────────────────────────────

    /// Nearest declaration of `name` visible from `scope`.
    pub fn resolve_identifier(&self, scope: ScopeId, name: &str) -> Option<&Identifier> {
        self.ancestors(scope)
            .find_map(|s| self.scope(s).identifiers.get(name))
            .map(|&id| self.identifier(id))
    }

    /// Nearest user function with this `(name, arity)`, falling back to the
    /// built-ins.
    pub fn resolve_function(&self, scope: ScopeId, name: &str, arity: usize) -> Option<&Function> {
        self.resolve_user_function(scope, name, arity)
            .or_else(|| self.builtin(name, arity))
            .map(|id| self.function(id))
    }

    /// Whether any overload of `name` is visible from `scope`. Lets callers
    /// tell "unknown function" from "wrong number of arguments".
    pub fn has_function_named(&self, scope: ScopeId, name: &str) -> bool {
        self.builtins.contains_key(name)
            || self
                .ancestors(scope)
                .any(|s| self.scope(s).functions.contains_key(name))
    }

    fn resolve_user_function(
        &self,
        scope: ScopeId,
        name: &str,
        arity: usize,
    ) -> Option<FunctionId> {
        self.ancestors(scope).find_map(|s| {
            self.scope(s)
                .functions
                .get(name)?
                .iter()
                .copied()
                .find(|&id| self.function(id).arity() == arity)
        })
    }

    fn builtin(&self, name: &str, arity: usize) -> Option<FunctionId> {
        self.builtins
            .get(name)?
            .iter()
            .copied()
            .find(|&id| self.function(id).arity() == arity)
    }

    // ── Initialization tracking ─────────────────────────────────────

    pub fn mark_globally_initialized(&mut self, id: IdentId) {
        self.identifiers[id.index()].init = Initialization::Global;
    }

    pub fn mark_initialized_in_block(&mut self, id: IdentId, block: ScopeId) {
        if let Initialization::Blocks(blocks) = &mut self.identifiers[id.index()].init {
            if !blocks.contains(&block) {
                blocks.push(block);
            }
        }
    }

    /// Record an assignment to `id` made in `block`: global when `block` is
    /// the declaring scope, block-local otherwise.
    pub fn mark_assigned(&mut self, id: IdentId, block: ScopeId) {
        if self.identifier(id).scope == block {
            self.mark_globally_initialized(id);
        } else {
            self.mark_initialized_in_block(id, block);
        }
    }

    /// Globally initialized, or assigned in exactly `block`.
    pub fn is_definitely_initialized(&self, id: IdentId, block: ScopeId) -> bool {
        self.identifier(id).init.covers(block)
    }

    /// Whether a read in `block` is safe: initialized in `block` or in any
    /// enclosing block up to the identifier's declaring scope.
    pub fn is_initialized_along(&self, id: IdentId, block: ScopeId) -> bool {
        let ident = self.identifier(id);
        if ident.init.is_global() {
            return true;
        }
        for s in self.ancestors(block) {
            if ident.init.covers(s) {
                return true;
            }
            if s == ident.scope {
                break;
            }
        }
        false
    }

    /// Identifiers recorded as assigned in exactly `block` (not globally).
    pub fn initialized_in_block(&self, block: ScopeId) -> Vec<IdentId> {
        self.identifiers
            .iter()
            .filter(|i| matches!(&i.init, Initialization::Blocks(b) if b.contains(&block)))
            .map(|i| i.id)
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
