//! Sparse Cholesky factorization, `A = L·Lᵀ` for symmetric positive
//! definite `A`.
//!
//! # Two-phase design
//!
//! 1. **Symbolic** ([`symbolic_cholesky`]): computes the elimination tree,
//!    a postorder, and the exact nonzero count of every factor column, so
//!    the caller can allocate the numeric output to the byte before any
//!    value is computed.
//! 2. **Numeric** ([`numeric_cholesky`]): up-looking factorization. Row
//!    `k`'s pattern is found by walking the elimination tree from each
//!    upper-triangle entry of `A[:,k]` ([`crate::etree::ereach`]); a sparse
//!    triangular solve against the already-finished columns produces the
//!    row's values; the diagonal comes from a square root.
//!
//! # Column counts
//!
//! Counts are computed by the row-subtree method: for each upper-triangle
//! entry `(i, k)`, walk from `i` up the tree until hitting a node already
//! visited for row `k`, incrementing each newly visited node's column
//! count. The walk lengths sum to exactly `nnz(L)`, so the symbolic phase
//! costs O(`nnz(L)`). Exact counts matter: the numeric phase appends
//! through per-column write cursors, and an undercount would corrupt the
//! following column.
//!
//! # Failure
//!
//! The numeric phase returns `-1` the first time a diagonal update is
//! non-positive (the matrix is not positive definite). Factorization halts
//! immediately; the partially written factor is not meaningful and must be
//! discarded.
//!
//! # References
//!
//! - Davis, T.A. "Direct Methods for Sparse Linear Systems", SIAM, 2006,
//!   Chapter 4: Cholesky factorization.
//! - Liu, J.W.H. "The role of elimination trees in sparse factorization",
//!   SIAM J. Matrix Anal. Appl., 1990.

use crate::csc::CscMatrix;
use crate::etree::{ereach, etree, postorder};
use crate::workspace::Workspace;

/// Result of the symbolic analysis: everything needed to size and drive
/// the numeric factorization.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SymbolicCholesky {
    /// Elimination tree; `-1` marks a root.
    pub parent: Vec<i64>,
    /// Postorder of the tree: children before parents.
    pub post: Vec<i64>,
    /// Exact nonzero count of each factor column (diagonal included).
    pub col_count: Vec<i64>,
    /// Column pointers of the factor, the cumulative sum of `col_count`.
    pub col_ptr: Vec<i64>,
    /// Total factor nonzeros, `col_ptr[n]`.
    pub nnz: usize,
}

/// Symbolic Cholesky analysis of a symmetric matrix (upper triangle read,
/// lower ignored).
pub fn symbolic_cholesky(a: &CscMatrix, ws: &mut Workspace) -> SymbolicCholesky {
    let n = a.cols;
    let mut parent = vec![-1i64; n];
    let mut post = vec![0i64; n];
    etree(a, &mut parent, &mut ws.idx[..n]);
    postorder(&parent, n, &mut post, &mut ws.idx[..3 * n]);

    // row-subtree walks; stamp[i] == k marks i as visited for row k
    let mut col_count = vec![1i64; n];
    let stamp = &mut ws.idx[..n];
    stamp.fill(-1);
    for k in 0..n {
        stamp[k] = k as i64;
        for p in a.col_range(k) {
            let mut i = a.row_idx[p] as usize;
            if i >= k {
                continue;
            }
            while stamp[i] != k as i64 {
                stamp[i] = k as i64;
                col_count[i] += 1;
                let pi = parent[i];
                if pi < 0 {
                    break;
                }
                i = pi as usize;
            }
        }
    }

    let mut col_ptr = vec![0i64; n + 1];
    for j in 0..n {
        col_ptr[j + 1] = col_ptr[j] + col_count[j];
    }
    let nnz = col_ptr[n] as usize;
    SymbolicCholesky {
        parent,
        post,
        col_count,
        col_ptr,
        nnz,
    }
}

/// Up-looking numeric Cholesky factorization.
///
/// `l` is resized to the symbolic nonzero count and overwritten; its
/// columns come out sorted with the diagonal entry first. Returns `0` on
/// success or `-1` as soon as a diagonal update is `<= 0` — the partial
/// factor is then garbage.
///
/// `ws` must be sized for dimension `n`; the dense accumulator in
/// `ws.val` is assumed zero on entry and is left zero on success.
pub fn numeric_cholesky(
    a: &CscMatrix,
    sym: &SymbolicCholesky,
    l: &mut CscMatrix,
    ws: &mut Workspace,
) -> i64 {
    let n = a.cols;
    l.rows = n;
    l.cols = n;
    l.col_ptr.clone_from(&sym.col_ptr);
    l.row_idx.clear();
    l.row_idx.resize(sym.nnz, 0);
    l.values.clear();
    l.values.resize(sym.nnz, 0.0);
    if n == 0 {
        return 0;
    }

    let (trav, cursors) = ws.idx.split_at_mut(2 * n);
    for j in 0..n {
        cursors[j] = sym.col_ptr[j];
    }
    ws.val[..n].fill(0.0);

    for k in 0..n {
        // pattern of row k of L, topological order
        let top = ereach(a, k, &sym.parent, trav, &mut ws.flag);

        // scatter the upper triangle of A[:,k]
        let mut d = 0.0;
        for p in a.col_range(k) {
            let i = a.row_idx[p] as usize;
            if i < k {
                ws.val[i] = a.values[p];
            } else if i == k {
                d = a.values[p];
            }
        }

        // sparse triangular solve along the pattern
        for px in top..n {
            let j = trav[px] as usize;
            let lp = sym.col_ptr[j] as usize; // diagonal of column j is first
            let lkj = ws.val[j] / l.values[lp];
            ws.val[j] = 0.0;
            for p in lp + 1..cursors[j] as usize {
                ws.val[l.row_idx[p] as usize] -= l.values[p] * lkj;
            }
            d -= lkj * lkj;
            let dst = cursors[j] as usize;
            cursors[j] += 1;
            l.row_idx[dst] = k as i64;
            l.values[dst] = lkj;
        }

        if d <= 0.0 {
            return -1;
        }
        let dst = cursors[k] as usize;
        cursors[k] += 1;
        l.row_idx[dst] = k as i64;
        l.values[dst] = d.sqrt();
    }
    0
}
