//! Reference interpreter for lowered Quill programs.
//!
//! Runs a [`TargetProgram`](quill_emit::TargetProgram) from its entry
//! method with a strict stack discipline: a method must return with exactly
//! its result (or nothing, for `Void`) above its frame base. Console I/O goes
//! through [`Console`], external routines through [`HostRegistry`], and
//! instrumentation through [`Observer`].

mod console;
mod error;
mod host;
mod machine;
mod observer;
mod value;

pub use console::{BufferConsole, Console, StdConsole};
pub use error::VmError;
pub use host::{HostFn, HostRegistry};
pub use machine::{Vm, VmConfig};
pub use observer::{LabelCounter, NoopObserver, Observer};
pub use value::{ArrayRef, ArrayValue, Value};
