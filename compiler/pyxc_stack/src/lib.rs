//! Stack growth guard for recursive front-end passes.
//!
//! The parser, the type registry and the body resolver all recurse on
//! user-controlled nesting depth (parenthesised expressions, chains of
//! `ptr[...]`, nested `if` suites). Each recursive entry point wraps its
//! body in [`ensure_sufficient_stack`] so that pathological input grows the
//! stack instead of overflowing it.

/// Grow the stack when less than this much remains (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (1MB).
const SEGMENT_SIZE: usize = 1024 * 1024;

/// Run `f`, first growing the stack if fewer than [`RED_ZONE`] bytes remain.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// WASM manages its own stack; call through.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
