//! Target instruction set.
//!
//! The machine has one operand stack per frame plus argument and local slot
//! arrays. Booleans are integers 0/1. Every instruction has a fixed effect on
//! the operand stack given by [`Instr::stack_effect`]; calls need the
//! program to know whether the callee returns a value.

use quill_ir::CompareOp;
use quill_types::{ElementType, Numeric};
use serde::{Deserialize, Serialize};

use crate::{HostRoutineId, Label, MethodId, StringId, TargetProgram};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Branch condition of [`Instr::BranchCmp`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cond {
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
}

impl Cond {
    pub fn holds<T: PartialOrd>(self, lhs: &T, rhs: &T) -> bool {
        match self {
            Cond::Lt => lhs < rhs,
            Cond::Gt => lhs > rhs,
            Cond::Le => lhs <= rhs,
            Cond::Ge => lhs >= rhs,
            Cond::Eq => lhs == rhs,
            Cond::Ne => lhs != rhs,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Cond::Lt => "lt",
            Cond::Gt => "gt",
            Cond::Le => "le",
            Cond::Ge => "ge",
            Cond::Eq => "eq",
            Cond::Ne => "ne",
        }
    }
}

impl From<CompareOp> for Cond {
    fn from(op: CompareOp) -> Self {
        match op {
            CompareOp::Lt => Cond::Lt,
            CompareOp::Gt => Cond::Gt,
            CompareOp::Le => Cond::Le,
            CompareOp::Ge => Cond::Ge,
            CompareOp::Eq => Cond::Eq,
            CompareOp::Ne => Cond::Ne,
        }
    }
}

/// Built-in routines with a fixed instruction template.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intrinsic {
    /// `String ->`
    Print,
    /// `String ->`
    PrintLn,
    /// `-> String`
    ReadLn,
    /// `Integer -> String`
    IntToStr,
    /// `Float -> String`
    FloatToStr,
    /// `Integer(0/1) -> String` ("true"/"false")
    BoolToStr,
    /// `String -> Integer`
    ParseInt,
    /// `String -> Float`
    ParseFloat,
    /// `String -> Integer`
    StrLen,
    /// `Array -> Integer` (total element count)
    ArrayLen,
    /// `String, Integer -> String` (one-character string)
    CharAt,
}

impl Intrinsic {
    /// `(pops, pushes)`
    pub fn stack_effect(self) -> (usize, usize) {
        match self {
            Intrinsic::Print | Intrinsic::PrintLn => (1, 0),
            Intrinsic::ReadLn => (0, 1),
            Intrinsic::IntToStr
            | Intrinsic::FloatToStr
            | Intrinsic::BoolToStr
            | Intrinsic::ParseInt
            | Intrinsic::ParseFloat
            | Intrinsic::StrLen
            | Intrinsic::ArrayLen => (1, 1),
            Intrinsic::CharAt => (2, 1),
        }
    }
}

/// Floats are stored as their bit pattern so `Instr` can be `Eq` and
/// `Hash`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instr {
    Nop,
    /// Branch-target marker; no runtime effect.
    Label(Label),

    PushInt(i64),
    PushFloat(u64),
    PushStr(StringId),

    LoadArg(u16),
    StoreArg(u16),
    LoadLocal(u16),
    StoreLocal(u16),

    /// Pops rhs then lhs, pushes `lhs op rhs`.
    Arith { op: ArithOp, ty: Numeric },
    /// Converts the integer on top of the stack to a float.
    IntToFloat,
    Concat,
    /// Pops two strings, pushes 1 if their contents are equal else 0.
    StrEq,

    /// Pops rhs then lhs, jumps if `lhs op rhs`.
    BranchCmp {
        cond: Cond,
        ty: Numeric,
        target: Label,
    },
    /// Pops a value, jumps if it is non-zero.
    BranchIfTrue(Label),
    Jump(Label),

    /// Pops `rank` dimensions (first dimension deepest), pushes the array.
    NewArray { element: ElementType, rank: u8 },
    /// Rank-1 read: pops index and array.
    LoadElem,
    /// Rank-1 write: pops value, index and array.
    StoreElem,
    /// Pops `rank` indices and the array.
    ArrayGet { rank: u8 },
    /// Pops value, `rank` indices and the array.
    ArraySet { rank: u8 },

    Call { method: MethodId, argc: u16 },
    CallHost(HostRoutineId),
    Intrinsic(Intrinsic),

    Pop,
    Return,
}

impl Instr {
    #[inline]
    pub fn push_float(value: f64) -> Instr {
        Instr::PushFloat(value.to_bits())
    }

    /// The branch target, for jumps and conditional branches.
    pub fn target(&self) -> Option<Label> {
        match self {
            Instr::BranchCmp { target, .. } => Some(*target),
            Instr::BranchIfTrue(target) | Instr::Jump(target) => Some(*target),
            _ => None,
        }
    }

    /// `(pops, pushes)` on the operand stack.
    ///
    /// `Return` is `(0, 0)`: it ends the frame, and the result it hands back
    /// stays counted by the expression that pushed it. Calls to ids missing
    /// from `program` are treated as returning nothing.
    pub fn stack_effect(&self, program: &TargetProgram) -> (usize, usize) {
        match self {
            Instr::Nop | Instr::Label(_) | Instr::Jump(_) => (0, 0),
            Instr::PushInt(_) | Instr::PushFloat(_) | Instr::PushStr(_) => (0, 1),
            Instr::LoadArg(_) | Instr::LoadLocal(_) => (0, 1),
            Instr::StoreArg(_) | Instr::StoreLocal(_) => (1, 0),
            Instr::Arith { .. } | Instr::Concat | Instr::StrEq => (2, 1),
            Instr::IntToFloat => (1, 1),
            Instr::BranchCmp { .. } => (2, 0),
            Instr::BranchIfTrue(_) | Instr::Pop => (1, 0),
            Instr::NewArray { rank, .. } => (usize::from(*rank), 1),
            Instr::LoadElem => (2, 1),
            Instr::StoreElem => (3, 0),
            Instr::ArrayGet { rank } => (usize::from(*rank) + 1, 1),
            Instr::ArraySet { rank } => (usize::from(*rank) + 2, 0),
            Instr::Call { method, argc } => {
                let pushes = program
                    .method(*method)
                    .map_or(0, |m| usize::from(m.returns_value()));
                (usize::from(*argc), pushes)
            }
            Instr::CallHost(id) => program.host_routine(*id).map_or((0, 0), |h| {
                (h.arity(), usize::from(h.return_type.is_value()))
            }),
            Instr::Intrinsic(intrinsic) => intrinsic.stack_effect(),
            Instr::Return => (0, 0),
        }
    }

    /// Net change in stack depth.
    pub fn depth_delta(&self, program: &TargetProgram) -> isize {
        let (pops, pushes) = self.stack_effect(program);
        isize::try_from(pushes).unwrap_or(isize::MAX) - isize::try_from(pops).unwrap_or(isize::MAX)
    }
}

#[cfg(test)]
mod tests;
