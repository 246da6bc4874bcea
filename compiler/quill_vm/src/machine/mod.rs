//! The execution loop.
//!
//! Calls push a [`Frame`] instead of recursing, so deep Quill recursion does
//! not grow the Rust stack. All frames share one operand stack; each frame
//! owns the region above its `base`.

mod ops;

use quill_emit::{Instr, Method, MethodId, TargetProgram};
use tracing::{debug, trace};

use crate::{Console, HostRegistry, Observer, Value, VmError};

/// Interpreter settings.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct VmConfig {
    /// Abort after this many executed instructions.
    pub step_limit: Option<u64>,
}

struct Frame {
    method: MethodId,
    args: Vec<Value>,
    locals: Vec<Value>,
    pc: usize,
    base: usize,
}

/// Executes a [`TargetProgram`].
pub struct Vm<'p> {
    program: &'p TargetProgram,
    config: VmConfig,
    hosts: HostRegistry,
    stack: Vec<Value>,
    frames: Vec<Frame>,
    steps: u64,
}

impl<'p> Vm<'p> {
    pub fn new(program: &'p TargetProgram, config: VmConfig) -> Self {
        Vm {
            program,
            config,
            hosts: HostRegistry::new(),
            stack: Vec::new(),
            frames: Vec::new(),
            steps: 0,
        }
    }

    #[must_use]
    pub fn with_hosts(mut self, hosts: HostRegistry) -> Self {
        self.hosts = hosts;
        self
    }

    /// Instructions executed by the last run.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Run the entry method.
    pub fn run(
        &mut self,
        console: &mut dyn Console,
        observer: &mut dyn Observer,
    ) -> Result<Option<Value>, VmError> {
        let entry = self
            .program
            .entry
            .ok_or_else(|| VmError::InvalidProgram("no entry method".to_owned()))?;
        self.run_method(entry, Vec::new(), console, observer)
    }

    /// Run `method` with `args` to completion and return its result.
    pub fn run_method(
        &mut self,
        method: MethodId,
        args: Vec<Value>,
        console: &mut dyn Console,
        observer: &mut dyn Observer,
    ) -> Result<Option<Value>, VmError> {
        self.stack.clear();
        self.frames.clear();
        self.steps = 0;

        self.push_frame(method, args)?;
        let result = self.execute(console, observer);
        debug!(steps = self.steps, ok = result.is_ok(), "program finished");
        result
    }

    fn method(&self, id: MethodId) -> Result<&'p Method, VmError> {
        self.program
            .method(id)
            .ok_or_else(|| VmError::InvalidProgram(format!("no method m{}", id.raw())))
    }

    fn push_frame(&mut self, id: MethodId, args: Vec<Value>) -> Result<(), VmError> {
        let method = self.method(id)?;
        if method.host.is_some() {
            return Err(VmError::InvalidProgram(format!(
                "`{}` is external and has no code",
                method.name
            )));
        }
        if args.len() != method.arity() {
            return Err(VmError::InvalidProgram(format!(
                "`{}` takes {} argument(s), {} given",
                method.name,
                method.arity(),
                args.len()
            )));
        }
        let locals = method
            .locals
            .iter()
            .map(|slot| Value::default_for(slot.ty))
            .collect();
        self.frames.push(Frame {
            method: id,
            args,
            locals,
            pc: 0,
            base: self.stack.len(),
        });
        Ok(())
    }

    fn execute(
        &mut self,
        console: &mut dyn Console,
        observer: &mut dyn Observer,
    ) -> Result<Option<Value>, VmError> {
        loop {
            let (method_id, pc) = match self.frames.last() {
                Some(frame) => (frame.method, frame.pc),
                None => return Err(VmError::InvalidProgram("no active frame".to_owned())),
            };
            let method = self.method(method_id)?;
            let Some(instr) = method.code.get(pc) else {
                return Err(VmError::InvalidProgram(format!(
                    "`{}` runs past its last instruction",
                    method.name
                )));
            };

            self.steps += 1;
            if let Some(limit) = self.config.step_limit {
                if self.steps > limit {
                    return Err(VmError::StepLimitExceeded(limit));
                }
            }
            trace!(method = %method.name, pc, instr = %instr, depth = self.stack.len(), "step");
            observer.on_step(method, pc, instr);

            if let Some(frame) = self.frames.last_mut() {
                frame.pc += 1;
            }

            if let Instr::Return = instr {
                if let Some(result) = self.return_from(method)? {
                    return Ok(result);
                }
                continue;
            }
            self.step(method, instr, console, observer)?;
        }
    }

    /// Pop the current frame. `Some(result)` when it was the outermost.
    fn return_from(&mut self, method: &Method) -> Result<Option<Option<Value>>, VmError> {
        let base = self.frame()?.base;
        let depth = self.stack.len() - base;
        let expected = usize::from(method.returns_value());
        if depth != expected {
            return Err(VmError::StackImbalance {
                method: method.name.clone(),
                depth,
                expected,
            });
        }
        let result = if expected == 1 { self.stack.pop() } else { None };
        self.frames.pop();
        if self.frames.is_empty() {
            return Ok(Some(result));
        }
        if let Some(value) = result {
            self.stack.push(value);
        }
        Ok(None)
    }

    fn frame(&self) -> Result<&Frame, VmError> {
        self.frames
            .last()
            .ok_or_else(|| VmError::InvalidProgram("no active frame".to_owned()))
    }

    fn frame_mut(&mut self) -> Result<&mut Frame, VmError> {
        self.frames
            .last_mut()
            .ok_or_else(|| VmError::InvalidProgram("no active frame".to_owned()))
    }

    /// Pop one value from the current frame's region.
    fn pop(&mut self, method: &Method) -> Result<Value, VmError> {
        let base = self.frame()?.base;
        if self.stack.len() <= base {
            return Err(VmError::StackUnderflow {
                method: method.name.clone(),
            });
        }
        self.stack.pop().ok_or_else(|| VmError::StackUnderflow {
            method: method.name.clone(),
        })
    }

    /// Pop `count` values, returned in push order.
    fn pop_n(&mut self, method: &Method, count: usize) -> Result<Vec<Value>, VmError> {
        let base = self.frame()?.base;
        if self.stack.len() < base + count {
            return Err(VmError::StackUnderflow {
                method: method.name.clone(),
            });
        }
        Ok(self.stack.split_off(self.stack.len() - count))
    }

    fn pop_int(&mut self, method: &Method) -> Result<i64, VmError> {
        self.pop(method)?.as_int()
    }

    fn jump(&mut self, method: &Method, label: quill_emit::Label) -> Result<(), VmError> {
        let target = method.label_position(label).ok_or_else(|| {
            VmError::InvalidProgram(format!(
                "label L{} is not bound in `{}`",
                label.raw(),
                method.name
            ))
        })?;
        self.frame_mut()?.pc = target;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
