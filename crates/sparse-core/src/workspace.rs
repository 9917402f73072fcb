//! Caller-owned scratch workspace.
//!
//! The kernels never allocate scratch internally: every traversal stack,
//! mark array and dense accumulator comes out of a `Workspace` the caller
//! creates once and threads through each call. Each kernel partitions the
//! workspace into named sub-slices at the top of its body (`split_at_mut`),
//! so a single `Workspace` can be reused across any sequence of calls.
//!
//! A `Workspace` built with [`Workspace::new`]`(n)` is large enough for
//! every kernel on matrices whose larger dimension is at most `n`:
//!
//! | field  | size | used as                                        |
//! |--------|------|------------------------------------------------|
//! | `idx`  | `3n` | DFS/output stack, edge cursors, write cursors  |
//! | `flag` | `n`  | visited marks (consumers clear what they set)  |
//! | `val`  | `n`  | dense accumulator / working column             |
//!
//! Concurrent calls sharing one `Workspace` are unsound by construction;
//! the borrow checker enforces the exclusive-use discipline that the
//! original flat-buffer design left to the caller.

/// Scratch buffers for the sparse kernels, sized for dimension `n`.
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Integer scratch, length `3n`.
    pub idx: Vec<i64>,
    /// Visited marks, length `n`. Kernels that set marks clear them again
    /// before returning, so this stays all-`false` between calls.
    pub flag: Vec<bool>,
    /// Dense numeric scratch, length `n`.
    pub val: Vec<f64>,
}

impl Workspace {
    /// Allocate scratch for matrices whose larger dimension is `n`.
    pub fn new(n: usize) -> Self {
        Self {
            idx: vec![0; 3 * n],
            flag: vec![false; n],
            val: vec![0.0; n],
        }
    }

    /// Grow the workspace if it is smaller than required for dimension `n`.
    pub fn ensure(&mut self, n: usize) {
        if self.flag.len() < n {
            self.idx.resize(3 * n, 0);
            self.flag.resize(n, false);
            self.val.resize(n, 0.0);
        }
    }

    /// The reachability pattern left in `idx[top..n]` by the last call to
    /// [`crate::graph::reach`].
    pub fn pattern(&self, top: usize, n: usize) -> &[i64] {
        &self.idx[top..n]
    }
}
