//! Human-readable assembly listing.

use std::fmt::{self, Write as _};

use quill_types::{Numeric, Type};

use crate::{ArithOp, Instr, Intrinsic, TargetProgram};

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instr::Nop => f.write_str("nop"),
            Instr::Label(label) => write!(f, "L{}:", label.raw()),
            Instr::PushInt(value) => write!(f, "push.i {value}"),
            Instr::PushFloat(bits) => write!(f, "push.f {:?}", f64::from_bits(*bits)),
            Instr::PushStr(id) => write!(f, "push.s #{}", id.raw()),
            Instr::LoadArg(slot) => write!(f, "ldarg {slot}"),
            Instr::StoreArg(slot) => write!(f, "starg {slot}"),
            Instr::LoadLocal(slot) => write!(f, "ldloc {slot}"),
            Instr::StoreLocal(slot) => write!(f, "stloc {slot}"),
            Instr::Arith { op, ty } => {
                let op = match op {
                    ArithOp::Add => "add",
                    ArithOp::Sub => "sub",
                    ArithOp::Mul => "mul",
                    ArithOp::Div => "div",
                };
                write!(f, "{op}.{}", numeric_suffix(*ty))
            }
            Instr::IntToFloat => f.write_str("conv.f"),
            Instr::Concat => f.write_str("concat"),
            Instr::StrEq => f.write_str("streq"),
            Instr::BranchCmp { cond, ty, target } => write!(
                f,
                "b{}.{} L{}",
                cond.mnemonic(),
                numeric_suffix(*ty),
                target.raw()
            ),
            Instr::BranchIfTrue(target) => write!(f, "brtrue L{}", target.raw()),
            Instr::Jump(target) => write!(f, "jmp L{}", target.raw()),
            Instr::NewArray { element, rank } => write!(f, "newarr {element} {rank}"),
            Instr::LoadElem => f.write_str("ldelem"),
            Instr::StoreElem => f.write_str("stelem"),
            Instr::ArrayGet { rank } => write!(f, "arrget {rank}"),
            Instr::ArraySet { rank } => write!(f, "arrset {rank}"),
            Instr::Call { method, argc } => write!(f, "call m{} {argc}", method.raw()),
            Instr::CallHost(id) => write!(f, "callhost h{}", id.raw()),
            Instr::Intrinsic(intrinsic) => write!(f, "{}", intrinsic_name(*intrinsic)),
            Instr::Pop => f.write_str("pop"),
            Instr::Return => f.write_str("ret"),
        }
    }
}

fn numeric_suffix(ty: Numeric) -> &'static str {
    match ty {
        Numeric::Integer => "i",
        Numeric::Float => "f",
    }
}

fn intrinsic_name(intrinsic: Intrinsic) -> &'static str {
    match intrinsic {
        Intrinsic::Print => "sys.print",
        Intrinsic::PrintLn => "sys.println",
        Intrinsic::ReadLn => "sys.readln",
        Intrinsic::IntToStr => "sys.itos",
        Intrinsic::FloatToStr => "sys.ftos",
        Intrinsic::BoolToStr => "sys.btos",
        Intrinsic::ParseInt => "sys.stoi",
        Intrinsic::ParseFloat => "sys.stof",
        Intrinsic::StrLen => "sys.strlen",
        Intrinsic::ArrayLen => "sys.arrlen",
        Intrinsic::CharAt => "sys.charat",
    }
}

/// Render the whole program: string pool, host routines, then every method
/// with its code. Label markers are printed flush left.
pub fn listing(program: &TargetProgram) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_listing(&mut out, program);
    out
}

fn write_listing(out: &mut String, program: &TargetProgram) -> fmt::Result {
    if !program.strings.is_empty() {
        writeln!(out, ".strings")?;
        for (i, text) in program.strings.iter().enumerate() {
            writeln!(out, "  #{i} {text:?}")?;
        }
        writeln!(out)?;
    }

    for (i, host) in program.host_routines.iter().enumerate() {
        writeln!(
            out,
            ".host h{i} {}({}): {}",
            host.qualified_name(),
            join_types(&host.params),
            host.return_type
        )?;
    }
    if !program.host_routines.is_empty() {
        writeln!(out)?;
    }

    for (i, method) in program.methods.iter().enumerate() {
        let entry = if program.entry.map(|id| id.index()) == Some(i) {
            " .entry"
        } else {
            ""
        };
        writeln!(
            out,
            ".method m{i} {}({}): {}{entry}",
            method.name,
            join_types(&method.params),
            method.return_type
        )?;
        if let Some(host) = method.host {
            writeln!(out, "  .extern h{}", host.raw())?;
            writeln!(out)?;
            continue;
        }
        for (slot, local) in method.locals.iter().enumerate() {
            writeln!(out, "  .local {slot} {}: {}", local.name, local.ty)?;
        }
        for instr in &method.code {
            match instr {
                Instr::Label(_) => writeln!(out, "{instr}")?,
                _ => writeln!(out, "    {instr}")?,
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

fn join_types(types: &[Type]) -> String {
    types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
