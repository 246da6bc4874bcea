//! Scopes, identifiers and functions stored in the symbol table.

use quill_types::Type;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

// ── ID newtypes ─────────────────────────────────────────────────────

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub fn new(raw: u32) -> Self {
                Self(raw)
            }

            #[inline]
            pub fn raw(self) -> u32 {
                self.0
            }

            /// Get the index as `usize` (for indexing into `Vec`s).
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

arena_id!(
    /// A scope in the table's arena. Scopes double as control-flow blocks
    /// for initialization tracking.
    ScopeId
);
arena_id!(
    /// An identifier declared somewhere in the table.
    IdentId
);
arena_id!(
    /// A user-declared or built-in function.
    FunctionId
);

/// Where an identifier is known to hold a value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Initialization {
    /// Assigned in its declaring block, so initialized everywhere below it.
    Global,
    /// Assigned only inside these nested blocks (empty = never assigned).
    Blocks(SmallVec<[ScopeId; 4]>),
}

impl Initialization {
    #[inline]
    pub fn is_global(&self) -> bool {
        matches!(self, Initialization::Global)
    }

    pub fn covers(&self, block: ScopeId) -> bool {
        match self {
            Initialization::Global => true,
            Initialization::Blocks(blocks) => blocks.contains(&block),
        }
    }
}

impl Default for Initialization {
    fn default() -> Self {
        Initialization::Blocks(SmallVec::new())
    }
}

/// A declared variable or argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identifier {
    pub id: IdentId,
    pub name: String,
    pub ty: Type,
    /// Nesting level of the declaring scope (root = 1).
    pub level: u32,
    pub scope: ScopeId,
    pub init: Initialization,
}

/// A positional function argument (positions start at 1).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Argument {
    pub name: String,
    pub ty: Type,
    pub position: usize,
}

impl Argument {
    pub fn new(name: impl Into<String>, ty: Type, position: usize) -> Self {
        Argument {
            name: name.into(),
            ty,
            position,
        }
    }
}

/// A function signature. Identity is `(name, arity)`; immutable once
/// declared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Function {
    pub id: FunctionId,
    pub name: String,
    pub return_type: Type,
    pub arguments: Vec<Argument>,
    pub level: u32,
    pub is_builtin: bool,
}

impl Function {
    #[inline]
    pub fn arity(&self) -> usize {
        self.arguments.len()
    }

    pub fn argument_types(&self) -> impl Iterator<Item = Type> + '_ {
        self.arguments.iter().map(|a| a.ty)
    }
}

/// One lexical scope.
#[derive(Clone, Debug, Default)]
pub struct Scope {
    pub(crate) parent: Option<ScopeId>,
    pub(crate) children: Vec<ScopeId>,
    pub(crate) level: u32,
    pub(crate) identifiers: FxHashMap<String, IdentId>,
    /// Overloads share a name; each entry has a distinct arity.
    pub(crate) functions: FxHashMap<String, SmallVec<[FunctionId; 2]>>,
}

impl Scope {
    #[inline]
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[ScopeId] {
        &self.children
    }

    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn identifier_ids(&self) -> impl Iterator<Item = IdentId> + '_ {
        self.identifiers.values().copied()
    }

    pub fn function_ids(&self) -> impl Iterator<Item = FunctionId> + '_ {
        self.functions.values().flatten().copied()
    }
}
