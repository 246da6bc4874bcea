//! Lowering of a checked [`Program`] into a [`TargetProgram`].
//!
//! The tree must already be annotated: the lowerer trusts every `Expr::ty`
//! and only fails ([`LowerError`]) on shapes no checked program can have, or
//! on built-in applications the target has no template for.

mod expr;
mod stmt;

use std::mem;

use quill_diagnostic::{lowering_failed, missing_entry, persistence_failed, Diagnostics};
use quill_ir::{FunctionDecl, Program};
use quill_types::Type;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{
    HostRoutine, HostRoutineId, Instr, LowerError, Method, MethodBuilder, MethodId, ProgramSink,
    StringId, TargetProgram,
};

/// Whether the value an expression produces is used by its parent.
///
/// Only call expressions can appear in discarded position; a discarded
/// value is popped right after it is produced.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ValueUse {
    Consumed,
    Discarded,
}

/// Name + arity: the identity of a function.
type Signature = (String, usize);

/// Program-level lowering state. One per compilation; [`reset`](Self::reset)
/// clears everything between runs.
///
/// Functions only live at the root scope, so the emitter's own
/// `(name, arity)` table holds exactly what the checker's root scope holds
/// minus the built-ins, which lower through the intrinsic table instead.
/// Lowering therefore needs the annotated tree alone.
#[derive(Default)]
pub struct Emitter {
    methods: FxHashMap<Signature, MethodId>,
    externals: FxHashMap<Signature, HostRoutineId>,
    strings: FxHashMap<String, StringId>,
    program: TargetProgram,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.methods.clear();
        self.externals.clear();
        self.strings.clear();
        self.program = TargetProgram::default();
    }

    /// Lower, locate the entry point and hand the result to `sink`.
    ///
    /// Failures are reported into `diagnostics` (without a span) and yield
    /// `None`.
    pub fn emit_program(
        &mut self,
        program: &Program,
        sink: &mut dyn ProgramSink,
        diagnostics: &mut Diagnostics,
    ) -> Option<TargetProgram> {
        let lowered = match self.lower_program(program) {
            Ok(lowered) => lowered,
            Err(err) => {
                diagnostics.report(lowering_failed(&err));
                return None;
            }
        };
        if lowered.entry.is_none() {
            diagnostics.report(missing_entry());
            return None;
        }
        if let Err(err) = sink.persist(&lowered) {
            diagnostics.report(persistence_failed(&err));
            return None;
        }
        Some(lowered)
    }

    /// Lower every function of `program`.
    ///
    /// All methods are declared before any body is lowered, so calls may
    /// refer to functions declared later in the file.
    pub fn lower_program(&mut self, program: &Program) -> Result<TargetProgram, LowerError> {
        self.reset();
        for function in &program.functions {
            self.declare(function)?;
        }
        for (index, function) in program.functions.iter().enumerate() {
            if function.is_external() {
                continue;
            }
            let method = self.lower_function(function)?;
            self.program.methods[index] = method;
        }
        let entry = self
            .methods
            .get(&("main".to_owned(), 0))
            .copied()
            .filter(|id| self.program.methods[id.index()].host.is_none());
        self.program.entry = entry;

        debug!(
            methods = self.program.methods.len(),
            strings = self.program.strings.len(),
            host_routines = self.program.host_routines.len(),
            "lowered program"
        );
        Ok(mem::take(&mut self.program))
    }

    /// Register the method (and for externals the host routine) for
    /// `function`. The body is filled in later.
    fn declare(&mut self, function: &FunctionDecl) -> Result<(), LowerError> {
        let signature = (function.name.clone(), function.arity());
        if self.methods.contains_key(&signature) {
            return Err(LowerError::Malformed(format!(
                "`{}` with {} argument(s) is declared twice",
                function.name,
                function.arity()
            )));
        }
        let params: Vec<Type> = function.params.iter().map(|p| p.ty).collect();

        let host = match &function.external {
            Some(package) => {
                let id = HostRoutineId::new(index_u32(self.program.host_routines.len()));
                self.program.host_routines.push(HostRoutine {
                    package: package.clone(),
                    name: function.name.clone(),
                    params: params.clone(),
                    return_type: function.return_type,
                });
                self.externals.insert(signature.clone(), id);
                Some(id)
            }
            None => None,
        };

        let id = MethodId::new(index_u32(self.program.methods.len()));
        self.program.methods.push(Method {
            name: function.name.clone(),
            params,
            return_type: function.return_type,
            locals: Vec::new(),
            code: Vec::new(),
            labels: Vec::new(),
            host,
        });
        self.methods.insert(signature, id);
        Ok(())
    }

    fn lower_function(&mut self, function: &FunctionDecl) -> Result<Method, LowerError> {
        let params = function.params.iter().map(|p| p.ty).collect();
        let mut lowerer = FunctionLowerer {
            emitter: self,
            builder: MethodBuilder::new(&function.name, params, function.return_type),
            return_type: function.return_type,
            args: FxHashMap::default(),
            scopes: vec![FxHashMap::default()],
        };
        for (position, param) in function.params.iter().enumerate() {
            let slot = u16::try_from(position).map_err(|_| {
                LowerError::Malformed(format!("too many arguments in `{}`", function.name))
            })?;
            lowerer.args.insert(param.name.clone(), (slot, param.ty));
        }

        lowerer.lower_stmts(&function.body.stmts)?;
        lowerer.builder.emit(Instr::Nop);
        lowerer.builder.emit(Instr::Return);
        let method = lowerer.builder.finish()?;

        debug!(
            method = %method.name,
            arity = method.arity(),
            instructions = method.code.len(),
            locals = method.locals.len(),
            "lowered method"
        );
        Ok(method)
    }

    /// Index of `text` in the string pool, adding it on first use.
    fn intern(&mut self, text: &str) -> StringId {
        if let Some(&id) = self.strings.get(text) {
            return id;
        }
        let id = StringId::new(index_u32(self.program.strings.len()));
        self.program.strings.push(text.to_owned());
        self.strings.insert(text.to_owned(), id);
        id
    }
}

fn index_u32(len: usize) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("table length exceeds u32::MAX"))
}

/// Where a name lives inside the method being lowered.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Slot {
    Arg(u16),
    Local(u16),
}

/// Lowering state for one function body. Argument and local maps live only
/// as long as the function.
struct FunctionLowerer<'e> {
    emitter: &'e mut Emitter,
    builder: MethodBuilder,
    return_type: Type,
    args: FxHashMap<String, (u16, Type)>,
    /// One map per open block, innermost last.
    scopes: Vec<FxHashMap<String, (u16, Type)>>,
}

impl FunctionLowerer<'_> {
    /// Locals shadow arguments; inner blocks shadow outer ones.
    fn resolve(&self, name: &str) -> Result<(Slot, Type), LowerError> {
        for scope in self.scopes.iter().rev() {
            if let Some(&(slot, ty)) = scope.get(name) {
                return Ok((Slot::Local(slot), ty));
            }
        }
        self.args
            .get(name)
            .map(|&(slot, ty)| (Slot::Arg(slot), ty))
            .ok_or_else(|| LowerError::UnresolvedSlot(name.to_owned()))
    }

    fn declare_local(&mut self, name: &str, ty: Type) -> Result<u16, LowerError> {
        let slot = self.builder.alloc_local(name, ty)?;
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_owned(), (slot, ty));
        }
        Ok(slot)
    }

    fn load(&mut self, slot: Slot) {
        self.builder.emit(match slot {
            Slot::Arg(slot) => Instr::LoadArg(slot),
            Slot::Local(slot) => Instr::LoadLocal(slot),
        });
    }

    fn store(&mut self, slot: Slot) {
        self.builder.emit(match slot {
            Slot::Arg(slot) => Instr::StoreArg(slot),
            Slot::Local(slot) => Instr::StoreLocal(slot),
        });
    }
}
