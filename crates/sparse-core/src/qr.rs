//! Sparse QR factorization by Householder reflections, `A = Q·R`.
//!
//! `Q` is never materialized: the factorization stores one Householder
//! vector per column (unit leading entry, sparse) plus its scalar
//! coefficient, and [`qmult`] applies their product to a vector on demand.
//!
//! # Algorithm
//!
//! One column at a time over a dense working column of length `m`:
//!
//! 1. Load `A[:,k]` into the working column and apply every previously
//!    computed reflection to it. Each application touches only the
//!    reflection's sparse support, never the full vector.
//! 2. The entries above the diagonal become column `k` of `R`.
//! 3. The sub-column `x[k..m)` is annihilated by a new reflection:
//!    `R[k,k] = -sign(x[k])·‖x[k..m)‖` (sign chosen to avoid
//!    cancellation), the Householder vector is normalized to a leading 1,
//!    and the coefficient is `β = 2/(vᵀv)`. A zero sub-column norm
//!    contributes no reflection (`β = 0`).
//!
//! # References
//!
//! - Golub, G.H., Van Loan, C.F. "Matrix Computations", 4th ed., §5.1-5.2.
//! - Davis, T.A. "Direct Methods for Sparse Linear Systems", SIAM, 2006,
//!   Chapter 5: orthogonal methods.

use crate::csc::CscMatrix;
use crate::workspace::Workspace;

/// Householder QR factors: `A = Q·R` with `Q` held implicitly.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QrFactors {
    /// Householder vectors, one column per reflection, unit leading entry.
    pub v: CscMatrix,
    /// Reflection coefficients; `beta[k] == 0.0` means column `k`
    /// contributed no reflection.
    pub beta: Vec<f64>,
    /// Upper triangular factor, `rows × cols` like `A`, diagonal stored
    /// last in each column.
    pub r: CscMatrix,
}

/// Householder QR factorization.
///
/// `ws` must be sized for `max(a.rows, a.cols)`, with `ws.val` zero on
/// entry (left zero on return). Rank-deficient columns are handled, not
/// rejected: they simply produce a zero coefficient.
pub fn qr_factor(a: &CscMatrix, ws: &mut Workspace) -> QrFactors {
    let m = a.rows;
    let n = a.cols;
    let mut v = CscMatrix::with_capacity(m, n, a.nnz() + n);
    let mut r = CscMatrix::with_capacity(m, n, a.nnz() + n);
    let mut beta = vec![0.0f64; n];
    let x = &mut ws.val;
    let mut vnz = 0usize;
    let mut rnz = 0usize;

    for k in 0..n {
        // dense working column, starting from A[:,k]
        for p in a.col_range(k) {
            x[a.row_idx[p] as usize] = a.values[p];
        }
        // apply previous reflections on their support only
        for j in 0..k {
            let bj = beta[j];
            if bj == 0.0 {
                continue;
            }
            let vs = v.col_ptr[j] as usize;
            let ve = v.col_ptr[j + 1] as usize;
            let mut dot = 0.0;
            for p in vs..ve {
                dot += v.values[p] * x[v.row_idx[p] as usize];
            }
            let s = bj * dot;
            if s != 0.0 {
                for p in vs..ve {
                    x[v.row_idx[p] as usize] -= s * v.values[p];
                }
            }
        }

        // strictly-upper part of the working column is R[:,k]
        for i in 0..k.min(m) {
            if x[i] != 0.0 {
                r.row_idx.push(i as i64);
                r.values.push(x[i]);
                rnz += 1;
                x[i] = 0.0;
            }
        }

        if k < m {
            // Householder vector annihilating x[k..m)
            let mut sigma = 0.0;
            for i in k..m {
                sigma += x[i] * x[i];
            }
            let norm = sigma.sqrt();
            let rdiag;
            if norm == 0.0 {
                beta[k] = 0.0;
                rdiag = 0.0;
                v.row_idx.push(k as i64);
                v.values.push(1.0);
                vnz += 1;
            } else {
                let s = if x[k] < 0.0 { -norm } else { norm };
                let v0 = x[k] + s;
                v.row_idx.push(k as i64);
                v.values.push(1.0);
                vnz += 1;
                let mut vtv = 1.0;
                for i in k + 1..m {
                    if x[i] != 0.0 {
                        let vi = x[i] / v0;
                        v.row_idx.push(i as i64);
                        v.values.push(vi);
                        vnz += 1;
                        vtv += vi * vi;
                        x[i] = 0.0;
                    }
                }
                beta[k] = 2.0 / vtv;
                rdiag = -s;
            }
            x[k] = 0.0;
            r.row_idx.push(k as i64);
            r.values.push(rdiag);
            rnz += 1;
        }

        v.col_ptr[k + 1] = vnz as i64;
        r.col_ptr[k + 1] = rnz as i64;
    }

    QrFactors { v, beta, r }
}

/// Apply the implicit orthogonal factor to a dense vector in place:
/// `x ← Qᵀ·x` when `transpose` is set (reflections in forward order),
/// `x ← Q·x` otherwise (reverse order).
pub fn qmult(v: &CscMatrix, beta: &[f64], x: &mut [f64], transpose: bool) {
    let n = v.cols;
    if transpose {
        for j in 0..n {
            apply_reflection(v, beta[j], j, x);
        }
    } else {
        for j in (0..n).rev() {
            apply_reflection(v, beta[j], j, x);
        }
    }
}

/// `x ← (I - β·v·vᵀ)·x`, confined to `v`'s support.
fn apply_reflection(v: &CscMatrix, beta: f64, j: usize, x: &mut [f64]) {
    if beta == 0.0 {
        return;
    }
    let mut dot = 0.0;
    for p in v.col_range(j) {
        dot += v.values[p] * x[v.row_idx[p] as usize];
    }
    let s = beta * dot;
    if s != 0.0 {
        for p in v.col_range(j) {
            x[v.row_idx[p] as usize] -= s * v.values[p];
        }
    }
}
