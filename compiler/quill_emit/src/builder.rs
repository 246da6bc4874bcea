//! Per-method instruction buffer with symbolic labels.

use quill_types::Type;

use crate::{Instr, Label, LocalSlot, LowerError, Method};

/// Sentinel for a label that has been created but not yet marked.
const UNMARKED: usize = usize::MAX;

/// Accumulates the code of one method.
///
/// Labels are allocated with [`new_label`](Self::new_label) before the code
/// that jumps to them, and bound with [`mark_label`](Self::mark_label).
/// [`finish`](Self::finish) rejects a method that still has an unmarked
/// label.
pub struct MethodBuilder {
    name: String,
    params: Vec<Type>,
    return_type: Type,
    locals: Vec<LocalSlot>,
    code: Vec<Instr>,
    labels: Vec<usize>,
}

impl MethodBuilder {
    pub fn new(name: impl Into<String>, params: Vec<Type>, return_type: Type) -> Self {
        MethodBuilder {
            name: name.into(),
            params,
            return_type,
            locals: Vec::new(),
            code: Vec::new(),
            labels: Vec::new(),
        }
    }

    pub fn new_label(&mut self) -> Label {
        let raw = u32::try_from(self.labels.len())
            .unwrap_or_else(|_| panic!("label count exceeds u32::MAX"));
        self.labels.push(UNMARKED);
        Label::new(raw)
    }

    /// Bind `label` to the current position by emitting its marker.
    pub fn mark_label(&mut self, label: Label) {
        debug_assert_eq!(
            self.labels[label.index()],
            UNMARKED,
            "label marked twice"
        );
        self.labels[label.index()] = self.code.len();
        self.code.push(Instr::Label(label));
    }

    #[inline]
    pub fn emit(&mut self, instr: Instr) {
        self.code.push(instr);
    }

    /// Reserve a new local slot.
    pub fn alloc_local(&mut self, name: &str, ty: Type) -> Result<u16, LowerError> {
        let slot = u16::try_from(self.locals.len()).map_err(|_| {
            LowerError::Malformed(format!("too many locals in `{}`", self.name))
        })?;
        self.locals.push(LocalSlot {
            name: name.to_owned(),
            ty,
        });
        Ok(slot)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> &[Instr] {
        &self.code
    }

    pub fn finish(self) -> Result<Method, LowerError> {
        if let Some(raw) = self.labels.iter().position(|&pos| pos == UNMARKED) {
            let raw = u32::try_from(raw).unwrap_or(u32::MAX);
            return Err(LowerError::UnmarkedLabel {
                method: self.name,
                label: Label::new(raw),
            });
        }
        Ok(Method {
            name: self.name,
            params: self.params,
            return_type: self.return_type,
            locals: self.locals,
            code: self.code,
            labels: self.labels,
            host: None,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
