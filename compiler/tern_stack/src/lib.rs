//! Recursion safety for the resolver.
//!
//! Resolution recurses through expressions, nested declarations and lazy
//! symbol initialization, so a pathological program can nest arbitrarily
//! deep. Two tools bound that:
//!
//! - [`ensure_sufficient_stack`] grows the native stack on demand
//!   (via `stacker`) so deep but legal nesting never overflows.
//! - [`DepthGuard`] counts nesting so callers can reject programs past a
//!   configured limit with a diagnostic instead of recursing forever.
//!
//! On WASM targets stack growth is a passthrough; the guard still applies.

/// Grow the stack when less than this much remains (100KB).
const RED_ZONE: usize = 100 * 1024;

/// Size of each newly allocated stack segment (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if the remaining space is below the red zone.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Nesting counter with an upper bound.
///
/// `enter` and `exit` must be paired; the resolver brackets each recursive
/// resolve call with them.
#[derive(Clone, Debug)]
pub struct DepthGuard {
    depth: u32,
    limit: u32,
    exceeded: bool,
}

impl DepthGuard {
    /// A limit of zero disables the bound.
    pub fn new(limit: u32) -> Self {
        DepthGuard {
            depth: 0,
            limit,
            exceeded: false,
        }
    }

    /// Enter one nesting level. Returns `false` once the limit is passed.
    #[inline]
    pub fn enter(&mut self) -> bool {
        self.depth += 1;
        if self.limit != 0 && self.depth > self.limit {
            self.exceeded = true;
            return false;
        }
        true
    }

    #[inline]
    pub fn exit(&mut self) {
        debug_assert!(self.depth > 0, "DepthGuard::exit without enter");
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Whether the limit was ever passed.
    pub fn exceeded(&self) -> bool {
        self.exceeded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deep_recursion_grows_the_stack() {
        fn nest(n: u64) -> u64 {
            ensure_sufficient_stack(|| if n == 0 { 0 } else { nest(n - 1) + 1 })
        }

        assert_eq!(nest(100_000), 100_000);
    }

    #[test]
    fn guard_rejects_past_limit() {
        let mut guard = DepthGuard::new(2);
        assert!(guard.enter());
        assert!(guard.enter());
        assert!(!guard.enter());
        assert!(guard.exceeded());
        guard.exit();
        guard.exit();
        guard.exit();
        assert_eq!(guard.depth(), 0);
    }

    #[test]
    fn zero_limit_is_unbounded() {
        let mut guard = DepthGuard::new(0);
        for _ in 0..10_000 {
            assert!(guard.enter());
        }
        assert!(!guard.exceeded());
    }
}
