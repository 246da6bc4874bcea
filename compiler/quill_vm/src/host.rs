//! Host routines backing `external` declarations.

use quill_emit::HostRoutine;
use quill_types::Type;
use rustc_hash::FxHashMap;

use crate::{Value, VmError};

/// A host implementation. Returns `None` for `Void` routines.
pub type HostFn = Box<dyn Fn(&[Value]) -> Result<Option<Value>, VmError>>;

/// Host routines keyed by package, name and argument types, so one name
/// can carry overloads that differ only in parameter types.
#[derive(Default)]
pub struct HostRegistry {
    routines: FxHashMap<(String, String, Vec<Type>), HostFn>,
}

impl HostRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The routines every `quill run` has available: `math.abs` over
    /// Integer and Float, `math.sqrt`, `math.pow`.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register("math", "abs", &[Type::Integer], |args| {
            Ok(Some(Value::Int(args[0].as_int()?.wrapping_abs())))
        });
        registry.register("math", "abs", &[Type::Float], |args| {
            Ok(Some(Value::Float(args[0].as_float()?.abs())))
        });
        registry.register("math", "sqrt", &[Type::Float], |args| {
            Ok(Some(Value::Float(args[0].as_float()?.sqrt())))
        });
        registry.register("math", "pow", &[Type::Float, Type::Float], |args| {
            Ok(Some(Value::Float(args[0].as_float()?.powf(args[1].as_float()?))))
        });
        registry
    }

    /// Register (or replace) the routine for exactly these parameter types.
    pub fn register<F>(&mut self, package: &str, name: &str, params: &[Type], routine: F)
    where
        F: Fn(&[Value]) -> Result<Option<Value>, VmError> + 'static,
    {
        self.routines.insert(
            (package.to_owned(), name.to_owned(), params.to_vec()),
            Box::new(routine),
        );
    }

    /// The routine whose package, name and parameter types all match the
    /// declaration.
    pub fn lookup(&self, routine: &HostRoutine) -> Option<&HostFn> {
        self.routines.get(&(
            routine.package.clone(),
            routine.name.clone(),
            routine.params.clone(),
        ))
    }

    pub fn len(&self) -> usize {
        self.routines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routines.is_empty()
    }
}
