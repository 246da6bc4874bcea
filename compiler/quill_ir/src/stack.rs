//! Stack growth for the recursive tree walks (checker, lowering) and the
//! interpreter's nested calls.
//!
//! Wrap each recursive step in [`ensure_sufficient_stack`]. When less than
//! the red zone remains, `stacker` switches to a freshly allocated segment
//! before running the closure.

/// Minimum stack space to keep available (100KB).
const RED_ZONE: usize = 100 * 1024;

/// Size of each newly allocated stack segment (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
