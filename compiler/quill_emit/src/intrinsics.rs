//! Instruction templates for the built-in functions.
//!
//! Built-ins never become methods. A call lowers its arguments as usual and
//! then appends the template chosen here from the callee name and the
//! annotated argument types.

use quill_types::Type;
use smallvec::{smallvec, SmallVec};

use crate::{Instr, Intrinsic, LowerError};

pub type Template = SmallVec<[Instr; 2]>;

/// The instructions that implement built-in `name` applied to arguments of
/// the given types. `None` if `name` is not a built-in of that arity.
pub fn template(name: &str, args: &[Type]) -> Option<Result<Template, LowerError>> {
    let template = match (name, args) {
        ("print", [_]) => Ok(smallvec![Instr::Intrinsic(Intrinsic::Print)]),
        ("println", [_]) => Ok(smallvec![Instr::Intrinsic(Intrinsic::PrintLn)]),
        ("readln", []) => Ok(smallvec![Instr::Intrinsic(Intrinsic::ReadLn)]),
        ("toint", [_]) => Ok(smallvec![Instr::Intrinsic(Intrinsic::ParseInt)]),
        ("tofloat", [_]) => Ok(smallvec![Instr::Intrinsic(Intrinsic::ParseFloat)]),
        ("tostr", [ty]) => to_string(*ty),
        ("length", [ty]) => length(*ty),
        _ => return None,
    };
    Some(template)
}

/// Whether built-in `name` leaves a result on the stack.
pub fn returns_value(name: &str) -> bool {
    !matches!(name, "print" | "println")
}

fn to_string(ty: Type) -> Result<Template, LowerError> {
    match ty {
        Type::Integer => Ok(smallvec![Instr::Intrinsic(Intrinsic::IntToStr)]),
        Type::Float => Ok(smallvec![Instr::Intrinsic(Intrinsic::FloatToStr)]),
        Type::Boolean => Ok(smallvec![Instr::Intrinsic(Intrinsic::BoolToStr)]),
        // Already a string: the argument is the result.
        Type::String => Ok(SmallVec::new()),
        other => Err(LowerError::unsupported("tostr", other)),
    }
}

fn length(ty: Type) -> Result<Template, LowerError> {
    match ty {
        Type::String => Ok(smallvec![Instr::Intrinsic(Intrinsic::StrLen)]),
        Type::Array(_) => Ok(smallvec![Instr::Intrinsic(Intrinsic::ArrayLen)]),
        other => Err(LowerError::unsupported("length", other)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
