//! Structural matrix operations: transpose, permutation, and
//! sparse-times-sparse multiplication.
//!
//! These are the building blocks the factorizations lean on: transpose is
//! a counting sort over row indices (and doubles as a column-sort when
//! applied twice), permutation applies `P·A·Q` in one pass, and multiply
//! uses the classical scatter/gather kernel with a per-column mark array.
//!
//! # References
//!
//! - Davis, T.A. "Direct Methods for Sparse Linear Systems", SIAM, 2006,
//!   §2.5 (transpose), §2.5 (permute), §2.8 (multiply).

use crate::csc::CscMatrix;
use crate::workspace::Workspace;

/// Turn per-column counts into column pointers, in place. `ptr[j]` ends
/// up as the running sum over `counts[0..j]`, `counts` is overwritten
/// with a copy of the new pointers, and the total is returned.
pub(crate) fn cumsum(ptr: &mut [i64], counts: &mut [i64]) -> usize {
    let mut nz = 0i64;
    for j in 0..counts.len() {
        ptr[j] = nz;
        nz += counts[j];
        counts[j] = ptr[j];
    }
    ptr[counts.len()] = nz;
    nz as usize
}

/// Transpose `A` into a fresh `cols × rows` matrix.
///
/// Two passes: count the entries per row of `A`, then scatter each entry
/// into its transposed column. Columns of the result come out with
/// ascending row indices, so `transpose(&transpose(a))` also serves as a
/// column sort.
pub fn transpose(a: &CscMatrix) -> CscMatrix {
    let m = a.rows;
    let n = a.cols;
    let nnz = a.nnz();
    let mut t = CscMatrix::with_capacity(n, m, nnz);
    t.row_idx.resize(nnz, 0);
    t.values.resize(nnz, 0.0);
    let mut count = vec![0i64; m];
    for p in 0..nnz {
        count[a.row_idx[p] as usize] += 1;
    }
    cumsum(&mut t.col_ptr, &mut count);
    for j in 0..n {
        for p in a.col_range(j) {
            let i = a.row_idx[p] as usize;
            let q = count[i] as usize;
            count[i] += 1;
            t.row_idx[q] = j as i64;
            t.values[q] = a.values[p];
        }
    }
    t
}

/// Symmetric-style permutation `C = P·A·Q`: `C[pinv[i], k] = A[i, q[k]]`.
///
/// `pinv` is the inverse row permutation (old row -> new row), `q` the
/// column permutation (new column -> old column). `None` means identity.
/// Row indices within each output column keep the source column's entry
/// order and are generally unsorted.
pub fn permute(a: &CscMatrix, pinv: Option<&[i64]>, q: Option<&[i64]>) -> CscMatrix {
    let m = a.rows;
    let n = a.cols;
    let mut c = CscMatrix::with_capacity(m, n, a.nnz());
    let mut nz = 0usize;
    for k in 0..n {
        c.col_ptr[k] = nz as i64;
        let j = match q {
            Some(q) => q[k] as usize,
            None => k,
        };
        for p in a.col_range(j) {
            let i = a.row_idx[p] as usize;
            let inew = match pinv {
                Some(pinv) => pinv[i],
                None => i as i64,
            };
            c.row_idx.push(inew);
            c.values.push(a.values[p]);
            nz += 1;
        }
    }
    c.col_ptr[n] = nz as i64;
    c
}

/// Sparse matrix product `C = A·B`.
///
/// Left-to-right scatter: for each column of `B`, every referenced column
/// of `A` is scattered into a dense accumulator, with a mark array
/// detecting first touches so the output pattern is built without
/// duplicates. `ws` must be sized for `a.rows`, with `ws.val` zero on
/// entry (left zero on return). Output columns are unsorted.
pub fn multiply(a: &CscMatrix, b: &CscMatrix, ws: &mut Workspace) -> CscMatrix {
    debug_assert_eq!(a.cols, b.rows, "inner dimensions must agree");
    let m = a.rows;
    let n = b.cols;
    let mut c = CscMatrix::with_capacity(m, n, multiply_nnz_upper_bound(a, b));
    let w = &mut ws.idx[..m];
    let x = &mut ws.val;
    w.fill(0);
    let mut nz = 0usize;
    for j in 0..n {
        c.col_ptr[j] = nz as i64;
        let mark = j as i64 + 1;
        for p in b.col_range(j) {
            let k = b.row_idx[p] as usize;
            let bkj = b.values[p];
            for q in a.col_range(k) {
                let i = a.row_idx[q] as usize;
                if w[i] < mark {
                    w[i] = mark;
                    c.row_idx.push(i as i64);
                    nz += 1;
                    x[i] = bkj * a.values[q];
                } else {
                    x[i] += bkj * a.values[q];
                }
            }
        }
        for p in c.col_ptr[j] as usize..nz {
            let i = c.row_idx[p] as usize;
            c.values.push(x[i]);
            x[i] = 0.0;
        }
    }
    c.col_ptr[n] = nz as i64;
    c
}

/// Cheap structural bound on `nnz(A·B)`: sum over columns of `B` of the
/// sizes of the referenced columns of `A`, each column capped at
/// `a.rows`. Never underestimates.
pub fn multiply_nnz_upper_bound(a: &CscMatrix, b: &CscMatrix) -> usize {
    let mut total = 0usize;
    for j in 0..b.cols {
        let mut col = 0usize;
        for p in b.col_range(j) {
            let k = b.row_idx[p] as usize;
            col += a.col_range(k).len();
        }
        total += col.min(a.rows);
    }
    total
}
