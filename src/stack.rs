//! Stack headroom for the recursive parser and evaluator.
//!
//! Both walk the program recursively on the host stack.  Wrapping each
//! recursive step in [`ensure_sufficient_stack`] moves execution onto a
//! freshly allocated segment whenever less than [`RED_ZONE`] bytes remain, so
//! deep user recursion and deeply nested source never overflow the thread's
//! own stack.

/// Remaining headroom below which a new segment is allocated.
pub const RED_ZONE: usize = 128 * 1024;

/// Size of each additional segment.
pub const STACK_PER_RECURSION: usize = 2 * 1024 * 1024;

/// Run `f`, growing the stack first if it is nearly exhausted.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
