//! Semantics of each instruction other than `Return`.

use std::cell::RefCell;
use std::rc::Rc;

use quill_emit::{ArithOp, Instr, Intrinsic, Method};
use quill_types::Numeric;

use super::Vm;
use crate::{ArrayValue, Console, Observer, Value, VmError};

impl<'p> Vm<'p> {
    pub(super) fn step(
        &mut self,
        method: &'p Method,
        instr: &Instr,
        console: &mut dyn Console,
        observer: &mut dyn Observer,
    ) -> Result<(), VmError> {
        match instr {
            Instr::Nop => {}
            Instr::Label(label) => observer.on_label(method, *label),

            Instr::PushInt(v) => self.stack.push(Value::Int(*v)),
            Instr::PushFloat(bits) => self.stack.push(Value::Float(f64::from_bits(*bits))),
            Instr::PushStr(id) => {
                let text = self.program.string(*id).ok_or_else(|| {
                    VmError::InvalidProgram(format!("no string #{}", id.raw()))
                })?;
                self.stack.push(Value::str(text));
            }

            Instr::LoadArg(slot) => {
                let value = slot_ref(&self.frame()?.args, *slot, "argument")?.clone();
                self.stack.push(value);
            }
            Instr::LoadLocal(slot) => {
                let value = slot_ref(&self.frame()?.locals, *slot, "local")?.clone();
                self.stack.push(value);
            }
            Instr::StoreArg(slot) => {
                let value = self.pop(method)?;
                *slot_mut(&mut self.frame_mut()?.args, *slot, "argument")? = value;
            }
            Instr::StoreLocal(slot) => {
                let value = self.pop(method)?;
                *slot_mut(&mut self.frame_mut()?.locals, *slot, "local")? = value;
            }

            Instr::Arith { op, ty } => {
                let rhs = self.pop(method)?;
                let lhs = self.pop(method)?;
                self.stack.push(arith(*op, *ty, &lhs, &rhs)?);
            }
            Instr::IntToFloat => {
                let v = self.pop_int(method)?;
                #[allow(clippy::cast_precision_loss, reason = "widening is lossy by definition")]
                self.stack.push(Value::Float(v as f64));
            }
            Instr::Concat => {
                let rhs = self.pop(method)?;
                let lhs = self.pop(method)?;
                let mut joined = String::with_capacity(lhs.as_str()?.len() + rhs.as_str()?.len());
                joined.push_str(lhs.as_str()?);
                joined.push_str(rhs.as_str()?);
                self.stack.push(Value::str(joined));
            }
            Instr::StrEq => {
                let rhs = self.pop(method)?;
                let lhs = self.pop(method)?;
                self.stack
                    .push(Value::boolean(lhs.as_str()? == rhs.as_str()?));
            }

            Instr::BranchCmp { cond, ty, target } => {
                let rhs = self.pop(method)?;
                let lhs = self.pop(method)?;
                let taken = match ty {
                    Numeric::Integer => cond.holds(&lhs.as_int()?, &rhs.as_int()?),
                    Numeric::Float => cond.holds(&lhs.as_float()?, &rhs.as_float()?),
                };
                if taken {
                    self.jump(method, *target)?;
                }
            }
            Instr::BranchIfTrue(target) => {
                if self.pop_int(method)? != 0 {
                    self.jump(method, *target)?;
                }
            }
            Instr::Jump(target) => self.jump(method, *target)?,

            Instr::NewArray { element, rank } => {
                let dims = self
                    .pop_n(method, usize::from(*rank))?
                    .iter()
                    .map(Value::as_int)
                    .collect::<Result<Vec<_>, _>>()?;
                let array = ArrayValue::new(*element, &dims)?;
                self.stack.push(Value::Array(Rc::new(RefCell::new(array))));
            }
            Instr::LoadElem => self.array_get(method, 1)?,
            Instr::ArrayGet { rank } => self.array_get(method, usize::from(*rank))?,
            Instr::StoreElem => self.array_set(method, 1)?,
            Instr::ArraySet { rank } => self.array_set(method, usize::from(*rank))?,

            Instr::Call { method: callee, argc } => {
                let args = self.pop_n(method, usize::from(*argc))?;
                self.push_frame(*callee, args)?;
            }
            Instr::CallHost(id) => self.call_host(method, *id)?,
            Instr::Intrinsic(intrinsic) => self.intrinsic(method, *intrinsic, console)?,

            Instr::Pop => {
                self.pop(method)?;
            }
            Instr::Return => {
                return Err(VmError::InvalidProgram(
                    "return must be handled by the execution loop".to_owned(),
                ));
            }
        }
        Ok(())
    }

    fn indices(&mut self, method: &Method, rank: usize) -> Result<Vec<i64>, VmError> {
        self.pop_n(method, rank)?
            .iter()
            .map(Value::as_int)
            .collect()
    }

    fn array_get(&mut self, method: &Method, rank: usize) -> Result<(), VmError> {
        let indices = self.indices(method, rank)?;
        let array = self.pop(method)?;
        let value = array.as_array()?.borrow().get(&indices)?;
        self.stack.push(value);
        Ok(())
    }

    fn array_set(&mut self, method: &Method, rank: usize) -> Result<(), VmError> {
        let value = self.pop(method)?;
        let indices = self.indices(method, rank)?;
        let array = self.pop(method)?;
        array.as_array()?.borrow_mut().set(&indices, value)?;
        Ok(())
    }

    fn call_host(&mut self, method: &Method, id: quill_emit::HostRoutineId) -> Result<(), VmError> {
        let routine = self.program.host_routine(id).ok_or_else(|| {
            VmError::InvalidProgram(format!("no host routine h{}", id.raw()))
        })?;
        let args = self.pop_n(method, routine.arity())?;
        let host = self
            .hosts
            .lookup(routine)
            .ok_or_else(|| VmError::UnknownHostRoutine(routine.qualified_name()))?;
        let result = host(&args)?;
        match (result, routine.return_type.is_value()) {
            (Some(value), true) => self.stack.push(value),
            (None, false) => {}
            (Some(_), false) => {
                return Err(VmError::HostFailure {
                    routine: routine.qualified_name(),
                    message: "returned a value from a Void routine".to_owned(),
                });
            }
            (None, true) => {
                return Err(VmError::HostFailure {
                    routine: routine.qualified_name(),
                    message: format!("returned nothing, expected {}", routine.return_type),
                });
            }
        }
        Ok(())
    }

    fn intrinsic(
        &mut self,
        method: &Method,
        intrinsic: Intrinsic,
        console: &mut dyn Console,
    ) -> Result<(), VmError> {
        let io = |err: std::io::Error| VmError::Io(err.to_string());
        let result = match intrinsic {
            Intrinsic::Print => {
                console.print(self.pop(method)?.as_str()?).map_err(io)?;
                None
            }
            Intrinsic::PrintLn => {
                console.println(self.pop(method)?.as_str()?).map_err(io)?;
                None
            }
            Intrinsic::ReadLn => {
                let line = console.read_line().map_err(io)?.unwrap_or_default();
                Some(Value::str(line))
            }
            Intrinsic::IntToStr => Some(Value::str(self.pop_int(method)?.to_string())),
            Intrinsic::FloatToStr => Some(Value::str(self.pop(method)?.as_float()?.to_string())),
            Intrinsic::BoolToStr => {
                let text = if self.pop_int(method)? == 0 { "false" } else { "true" };
                Some(Value::str(text))
            }
            Intrinsic::ParseInt => {
                let input = self.pop(method)?;
                let text = input.as_str()?;
                let value = text.trim().parse::<i64>().map_err(|_| VmError::MalformedNumber {
                    input: text.to_owned(),
                    expected: "integer",
                })?;
                Some(Value::Int(value))
            }
            Intrinsic::ParseFloat => {
                let input = self.pop(method)?;
                let text = input.as_str()?;
                let value = text.trim().parse::<f64>().map_err(|_| VmError::MalformedNumber {
                    input: text.to_owned(),
                    expected: "float",
                })?;
                Some(Value::Float(value))
            }
            Intrinsic::StrLen => {
                let len = self.pop(method)?.as_str()?.chars().count();
                Some(Value::Int(i64::try_from(len).unwrap_or(i64::MAX)))
            }
            Intrinsic::ArrayLen => {
                let len = self.pop(method)?.as_array()?.borrow().len();
                Some(Value::Int(i64::try_from(len).unwrap_or(i64::MAX)))
            }
            Intrinsic::CharAt => {
                let index = self.pop_int(method)?;
                let text = self.pop(method)?;
                let text = text.as_str()?;
                let len = text.chars().count();
                let ch = usize::try_from(index)
                    .ok()
                    .and_then(|i| text.chars().nth(i))
                    .ok_or(VmError::IndexOutOfBounds { index, len })?;
                Some(Value::str(ch.to_string()))
            }
        };
        if let Some(value) = result {
            self.stack.push(value);
        }
        Ok(())
    }
}

fn arith(op: ArithOp, ty: Numeric, lhs: &Value, rhs: &Value) -> Result<Value, VmError> {
    match ty {
        Numeric::Integer => {
            let (a, b) = (lhs.as_int()?, rhs.as_int()?);
            let v = match op {
                ArithOp::Add => a.wrapping_add(b),
                ArithOp::Sub => a.wrapping_sub(b),
                ArithOp::Mul => a.wrapping_mul(b),
                ArithOp::Div => {
                    if b == 0 {
                        return Err(VmError::DivisionByZero);
                    }
                    a.wrapping_div(b)
                }
            };
            Ok(Value::Int(v))
        }
        Numeric::Float => {
            let (a, b) = (lhs.as_float()?, rhs.as_float()?);
            let v = match op {
                ArithOp::Add => a + b,
                ArithOp::Sub => a - b,
                ArithOp::Mul => a * b,
                ArithOp::Div => a / b,
            };
            Ok(Value::Float(v))
        }
    }
}

fn slot_ref<'a>(slots: &'a [Value], slot: u16, what: &str) -> Result<&'a Value, VmError> {
    slots
        .get(usize::from(slot))
        .ok_or_else(|| VmError::InvalidProgram(format!("no {what} slot {slot}")))
}

fn slot_mut<'a>(slots: &'a mut [Value], slot: u16, what: &str) -> Result<&'a mut Value, VmError> {
    slots
        .get_mut(usize::from(slot))
        .ok_or_else(|| VmError::InvalidProgram(format!("no {what} slot {slot}")))
}
