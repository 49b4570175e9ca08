//! Indentation depth for `layout-trace` output.

use std::cell::Cell;

thread_local! {
    static TRACE_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Decrements the trace depth on all return paths.
pub(crate) struct DepthGuard {
    depth: usize,
}

impl DepthGuard {
    pub(crate) fn enter() -> Self {
        let depth = TRACE_DEPTH.with(|d| {
            let current = d.get();
            d.set(current + 1);
            current
        });
        Self { depth }
    }

    pub(crate) fn indent(&self) -> String {
        "  ".repeat(self.depth)
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        TRACE_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}
