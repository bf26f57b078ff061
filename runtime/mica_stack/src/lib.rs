//! Stack growth for nested dispatch.
//!
//! A single script call can fan out into arbitrarily deep native recursion:
//! an overload set dispatches to a bound function, which forwards to a
//! script-defined function, whose guard is itself dispatched, and so on.
//! Every `ProxyFunction::call` runs inside [`ensure_sufficient_stack`] so
//! that deep call chains grow the stack instead of aborting the host.
//!
//! - **Native targets**: `stacker::maybe_grow`.
//! - **WASM targets**: plain passthrough.

/// Remaining stack below which a new segment is allocated (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (2MB).
const STACK_PER_SEGMENT: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_SEGMENT, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
