//! Execution hooks.

use quill_emit::{Instr, Label, Method};
use rustc_hash::FxHashMap;

/// Callbacks invoked while a program runs.
pub trait Observer {
    /// Before every instruction.
    fn on_step(&mut self, _method: &Method, _pc: usize, _instr: &Instr) {}

    /// Whenever execution passes a label marker.
    fn on_label(&mut self, _method: &Method, _label: Label) {}
}

/// Observes nothing.
pub struct NoopObserver;

impl Observer for NoopObserver {}

/// Counts how many times each label marker is reached, and the total
/// number of steps.
#[derive(Default, Debug)]
pub struct LabelCounter {
    hits: FxHashMap<(String, Label), u64>,
    steps: u64,
}

impl LabelCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hits(&self, method: &str, label: Label) -> u64 {
        self.hits
            .get(&(method.to_owned(), label))
            .copied()
            .unwrap_or(0)
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Every `(method, label, hits)` recorded, ordered by method then label.
    pub fn all_hits(&self) -> Vec<(&str, Label, u64)> {
        let mut hits: Vec<_> = self
            .hits
            .iter()
            .map(|((method, label), count)| (method.as_str(), *label, *count))
            .collect();
        hits.sort_unstable();
        hits
    }
}

impl Observer for LabelCounter {
    fn on_step(&mut self, _method: &Method, _pc: usize, _instr: &Instr) {
        self.steps += 1;
    }

    fn on_label(&mut self, method: &Method, label: Label) {
        *self.hits.entry((method.name.clone(), label)).or_default() += 1;
    }
}
