//! The lowered program: methods, string pool and host-routine table.

use quill_types::Type;
use serde::{Deserialize, Serialize};

use crate::Instr;

// ── ID newtypes ─────────────────────────────────────────────────────

macro_rules! index_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
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

index_id!(
    /// A method in [`TargetProgram::methods`].
    MethodId
);
index_id!(
    /// An entry in the interned string-literal pool.
    StringId
);
index_id!(
    /// An external routine in [`TargetProgram::host_routines`].
    HostRoutineId
);
index_id!(
    /// A branch target, local to one method.
    Label
);

/// A local variable slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalSlot {
    pub name: String,
    pub ty: Type,
}

/// One executable method.
///
/// `labels[l]` is the index in `code` of the `Instr::Label(l)` marker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    /// Argument slot types, in order.
    pub params: Vec<Type>,
    pub return_type: Type,
    pub locals: Vec<LocalSlot>,
    pub code: Vec<Instr>,
    pub labels: Vec<usize>,
    /// Set for external declarations, which have no code.
    pub host: Option<HostRoutineId>,
}

impl Method {
    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    #[inline]
    pub fn returns_value(&self) -> bool {
        self.return_type.is_value()
    }

    #[inline]
    pub fn label_position(&self, label: Label) -> Option<usize> {
        self.labels.get(label.index()).copied()
    }
}

/// An external routine bound by `package` + `name` + argument types.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HostRoutine {
    pub package: String,
    pub name: String,
    pub params: Vec<Type>,
    pub return_type: Type,
}

impl HostRoutine {
    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// `package.name`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.package, self.name)
    }
}

/// A complete lowered program.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetProgram {
    pub methods: Vec<Method>,
    pub strings: Vec<String>,
    pub host_routines: Vec<HostRoutine>,
    pub entry: Option<MethodId>,
}

impl TargetProgram {
    #[inline]
    pub fn method(&self, id: MethodId) -> Option<&Method> {
        self.methods.get(id.index())
    }

    #[inline]
    pub fn string(&self, id: StringId) -> Option<&str> {
        self.strings.get(id.index()).map(String::as_str)
    }

    #[inline]
    pub fn host_routine(&self, id: HostRoutineId) -> Option<&HostRoutine> {
        self.host_routines.get(id.index())
    }

    pub fn find_method(&self, name: &str, arity: usize) -> Option<(MethodId, &Method)> {
        self.methods
            .iter()
            .enumerate()
            .find(|(_, m)| m.name == name && m.arity() == arity)
            .map(|(i, m)| (MethodId::new(u32::try_from(i).unwrap_or(u32::MAX)), m))
    }

    pub fn entry_method(&self) -> Option<&Method> {
        self.method(self.entry?)
    }
}
