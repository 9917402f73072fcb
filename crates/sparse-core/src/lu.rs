//! Sparse LU factorization with threshold partial pivoting,
//! `P·A·Q = L·U`.
//!
//! # Algorithm
//!
//! Left-looking, one column per step, in the Gilbert-Peierls style: the
//! pattern of `L⁻¹·A[:,k]` is found by depth-first reachability over the
//! partially built `L` ([`crate::graph::reach`]), the numeric values by a
//! sparse triangular solve over that pattern
//! ([`crate::trisolve::spsolve`]), and the pivot by a scan of the
//! still-unassigned rows. There is no separate symbolic phase — the solve
//! pattern doubles as the symbolic result for each column, and `L`/`U`
//! grow column by column.
//!
//! # Threshold pivoting
//!
//! Strict largest-magnitude pivoting minimizes element growth but tends to
//! destroy sparsity. With tolerance `tol`, the smallest-index unassigned
//! row whose magnitude is at least `tol` times the best available
//! magnitude is preferred instead; `tol = 1.0` recovers strict partial
//! pivoting, small `tol` favors sparsity.
//!
//! # Failure
//!
//! If at some column `k` no unassigned row carries a positive magnitude,
//! the matrix is structurally singular at that column and `-(k+1)` is
//! returned (1-based negated column index). No further columns are
//! processed and no factors are produced.
//!
//! # References
//!
//! - Gilbert, J.R., Peierls, T. "Sparse partial pivoting in time
//!   proportional to arithmetic operations", SIAM J. Sci. Stat. Comput., 1988.
//! - Davis, T.A. "Direct Methods for Sparse Linear Systems", SIAM, 2006,
//!   Chapter 6: LU factorization.

use crate::csc::CscMatrix;
use crate::graph::reach;
use crate::trisolve::spsolve;
use crate::workspace::Workspace;

/// The factors of `P·A·Q = L·U`.
///
/// `L` is lower triangular with a unit diagonal stored explicitly as the
/// first entry of each column; `U` is upper triangular with its diagonal
/// stored as the last entry of each column. Row indices of both factors
/// are in pivot-permuted space.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LuFactors {
    /// Unit lower triangular factor.
    pub l: CscMatrix,
    /// Upper triangular factor.
    pub u: CscMatrix,
    /// Row permutation from pivoting: `pinv[old_row] = pivot position`.
    pub pinv: Vec<i64>,
}

/// Factor a square matrix with threshold partial pivoting.
///
/// `q` is an optional fill-reducing column permutation (new-to-old, as
/// produced by the `ordering` module); `None` means natural order. `tol`
/// in `(0, 1]` is the pivot threshold.
///
/// Returns `(0, Some(factors))` on success, or `(-(k+1), None)` if column
/// `k` is structurally singular.
///
/// `ws` must be sized for dimension `n` with `ws.val` zero on entry (it is
/// left zero again on return).
pub fn lu_factor(
    a: &CscMatrix,
    q: Option<&[i64]>,
    tol: f64,
    ws: &mut Workspace,
) -> (i64, Option<LuFactors>) {
    debug_assert!(a.is_square());
    let n = a.cols;
    if n == 0 {
        return (
            0,
            Some(LuFactors {
                l: CscMatrix::zero(0, 0),
                u: CscMatrix::zero(0, 0),
                pinv: Vec::new(),
            }),
        );
    }

    // initial guess; entry storage grows as fill appears
    let cap = 4 * a.nnz() + n;
    let mut l = CscMatrix::with_capacity(n, n, cap);
    let mut u = CscMatrix::with_capacity(n, n, cap);
    let mut pinv = vec![-1i64; n];
    let mut lnz = 0usize;
    let mut unz = 0usize;

    for k in 0..n {
        l.col_ptr[k] = lnz as i64;
        u.col_ptr[k] = unz as i64;
        let col = q.map_or(k, |q| q[k] as usize);

        // pattern and values of x = L \ A[:,col]
        let top = reach(&l, a, col, ws, Some(&pinv));
        for p in a.col_range(col) {
            ws.val[a.row_idx[p] as usize] = a.values[p];
        }
        spsolve(&l, &ws.idx[top..n], &mut ws.val, Some(&pinv), true);

        // largest magnitude among unassigned rows; assigned rows go to U
        let mut ipiv: i64 = -1;
        let mut a_max = -1.0f64;
        for px in top..n {
            let i = ws.idx[px] as usize;
            if pinv[i] < 0 {
                let t = ws.val[i].abs();
                if t > a_max {
                    a_max = t;
                    ipiv = i as i64;
                }
            } else {
                u.row_idx.push(pinv[i]);
                u.values.push(ws.val[i]);
                unz += 1;
            }
        }
        if ipiv == -1 || a_max <= 0.0 {
            // every touched position of ws.val is in the pattern
            for px in top..n {
                ws.val[ws.idx[px] as usize] = 0.0;
            }
            return (-(k as i64) - 1, None);
        }

        // threshold rule: smallest-index unassigned row within tol of the best
        let mut chosen = ipiv as usize;
        for px in top..n {
            let i = ws.idx[px] as usize;
            if pinv[i] < 0 && i < chosen && ws.val[i].abs() >= tol * a_max {
                chosen = i;
            }
        }
        let ipiv = chosen;
        let pivot = ws.val[ipiv];

        u.row_idx.push(k as i64);
        u.values.push(pivot);
        unz += 1;
        pinv[ipiv] = k as i64;
        l.row_idx.push(ipiv as i64);
        l.values.push(1.0);
        lnz += 1;
        for px in top..n {
            let i = ws.idx[px] as usize;
            if pinv[i] < 0 {
                l.row_idx.push(i as i64);
                l.values.push(ws.val[i] / pivot);
                lnz += 1;
            }
            ws.val[i] = 0.0;
        }
    }
    l.col_ptr[n] = lnz as i64;
    u.col_ptr[n] = unz as i64;

    // relabel L's rows into pivot space
    for p in 0..lnz {
        l.row_idx[p] = pinv[l.row_idx[p] as usize];
    }

    (0, Some(LuFactors { l, u, pinv }))
}
