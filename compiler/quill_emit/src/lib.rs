//! Code generation for Quill.
//!
//! Lowers a checked, type-annotated [`Program`](quill_ir::Program) into a
//! [`TargetProgram`] for a stack machine:
//!
//! - [`program`]: methods, the string pool and host-routine table
//! - [`instr`]: the instruction set and per-instruction stack effects
//! - [`MethodBuilder`]: instruction buffer with symbolic labels
//! - [`Emitter`]: the recursive lowering itself
//! - [`ProgramSink`]: where the finished program goes (bytecode file,
//!   assembly listing, memory)
//!
//! Every expression leaves exactly one value on the stack (none for a `Void`
//! call); a value whose use is [`ValueUse::Discarded`] is popped at once.

mod builder;
mod error;
pub mod instr;
pub mod intrinsics;
mod listing;
mod lower;
pub mod persist;
pub mod program;

pub use builder::MethodBuilder;
pub use error::{LowerError, PersistError};
pub use instr::{ArithOp, Cond, Instr, Intrinsic};
pub use listing::listing;
pub use lower::{Emitter, ValueUse};
pub use persist::{load_bytecode, AssemblySink, BytecodeSink, MemorySink, ProgramSink};
pub use program::{
    HostRoutine, HostRoutineId, Label, LocalSlot, Method, MethodId, StringId, TargetProgram,
};
