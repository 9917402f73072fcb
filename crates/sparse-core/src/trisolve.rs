//! Sparse triangular solve restricted to a reachability pattern.
//!
//! Solves `G·x = b` in place on a dense vector `x` that the caller has
//! loaded with `b`'s values at the relevant positions and zero elsewhere.
//! Only the positions named by `pattern` — normally produced by
//! [`crate::graph::reach`] — are read or written, which is the entire point:
//! the solve never scans the mostly-zero remainder of `x`.

use crate::csc::CscMatrix;

/// Pattern-restricted triangular solve, in place on `x`.
///
/// `pattern` must list the solve's nonzero support in dependency order
/// (each node before the nodes its column updates), exactly as
/// [`crate::graph::reach`] emits it. `lower` selects forward substitution
/// against a lower factor or back substitution against an upper factor; it
/// also orients the diagonal scan, since lower factors keep the diagonal
/// near the front of a column and upper factors near the back.
///
/// When `pinv` is given, pattern node `j` solves against column `pinv[j]`
/// of `G`; a negative mapped index means that column has not been assigned
/// yet (LU mid-factorization) and the node is skipped. The diagonal entry
/// of a column is located by linear scan — columns are not assumed sorted.
pub fn spsolve(
    g: &CscMatrix,
    pattern: &[i64],
    x: &mut [f64],
    pinv: Option<&[i64]>,
    lower: bool,
) -> i64 {
    for &jn in pattern {
        let j = jn as usize;
        let jcol = match pinv {
            Some(p) => p[j],
            None => j as i64,
        };
        if jcol < 0 {
            continue;
        }
        let jcol = jcol as usize;
        let start = g.col_ptr[jcol] as usize;
        let end = g.col_ptr[jcol + 1] as usize;
        let diag = if lower {
            (start..end).find(|&p| g.row_idx[p] as usize == j)
        } else {
            (start..end).rev().find(|&p| g.row_idx[p] as usize == j)
        };
        let Some(dp) = diag else {
            // structurally missing diagonal: nothing to eliminate with
            continue;
        };
        x[j] /= g.values[dp];
        let xj = x[j];
        for p in start..end {
            if p == dp {
                continue;
            }
            x[g.row_idx[p] as usize] -= g.values[p] * xj;
        }
    }
    0
}
