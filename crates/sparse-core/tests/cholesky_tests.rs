//! Tests for the symbolic and numeric Cholesky factorization.

use sparse_core::cholesky::{numeric_cholesky, symbolic_cholesky};
use sparse_core::{CscMatrix, Workspace};

fn to_dense(a: &CscMatrix) -> Vec<Vec<f64>> {
    let mut d = vec![vec![0.0; a.cols]; a.rows];
    for j in 0..a.cols {
        for p in a.col_range(j) {
            d[a.row_idx[p] as usize][j] += a.values[p];
        }
    }
    d
}

/// Compare L·Lᵀ against A entrywise.
fn check_llt(l: &CscMatrix, a: &CscMatrix, tol: f64) {
    let n = a.cols;
    let ld = to_dense(l);
    let ad = to_dense(a);
    for i in 0..n {
        for j in 0..n {
            let mut s = 0.0;
            for k in 0..n {
                s += ld[i][k] * ld[j][k];
            }
            assert!(
                (s - ad[i][j]).abs() < tol,
                "(L·Lᵀ)[{}][{}] = {}, A = {}",
                i,
                j,
                s,
                ad[i][j]
            );
        }
    }
}

fn tridiagonal_spd(n: usize) -> CscMatrix {
    let mut col_ptr = vec![0i64];
    let mut row_idx = Vec::new();
    let mut values = Vec::new();
    for j in 0..n {
        if j > 0 {
            row_idx.push(j as i64 - 1);
            values.push(-1.0);
        }
        row_idx.push(j as i64);
        values.push(2.0);
        if j + 1 < n {
            row_idx.push(j as i64 + 1);
            values.push(-1.0);
        }
        col_ptr.push(row_idx.len() as i64);
    }
    CscMatrix::new(n, n, col_ptr, row_idx, values)
}

// ============================================================================
// Symbolic analysis
// ============================================================================

#[test]
fn test_symbolic_tridiagonal_counts() {
    let a = tridiagonal_spd(3);
    let mut ws = Workspace::new(3);
    let sym = symbolic_cholesky(&a, &mut ws);
    assert_eq!(sym.parent, vec![1, 2, -1]);
    // each column holds its diagonal plus one subdiagonal, except the last
    assert_eq!(sym.col_count, vec![2, 2, 1]);
    assert_eq!(sym.nnz, 5);
    assert_eq!(sym.col_ptr, vec![0, 2, 4, 5]);
}

#[test]
fn test_symbolic_counts_include_fill() {
    // A = [ 4 1 1 ]
    //     [ 1 4 0 ]
    //     [ 1 0 4 ]
    // L(2,1) fills in even though A(2,1) = 0
    let a = CscMatrix::new(
        3,
        3,
        vec![0, 3, 5, 7],
        vec![0, 1, 2, 0, 1, 0, 2],
        vec![4.0, 1.0, 1.0, 1.0, 4.0, 1.0, 4.0],
    );
    let mut ws = Workspace::new(3);
    let sym = symbolic_cholesky(&a, &mut ws);
    assert_eq!(sym.col_count, vec![3, 2, 1], "fill entry must be counted");
}

// ============================================================================
// Numeric factorization
// ============================================================================

#[test]
fn test_numeric_2x2_known_factor() {
    // A = [ 4 2 ]       L = [ 2 0  ]
    //     [ 2 3 ],          [ 1 √2 ]
    let a = CscMatrix::new(
        2,
        2,
        vec![0, 2, 4],
        vec![0, 1, 0, 1],
        vec![4.0, 2.0, 2.0, 3.0],
    );
    let mut ws = Workspace::new(2);
    let sym = symbolic_cholesky(&a, &mut ws);
    let mut l = CscMatrix::zero(2, 2);
    let status = numeric_cholesky(&a, &sym, &mut l, &mut ws);
    assert_eq!(status, 0);
    let d = to_dense(&l);
    assert!((d[0][0] - 2.0).abs() < 1e-12, "L[0][0] = {}", d[0][0]);
    assert!((d[1][0] - 1.0).abs() < 1e-12, "L[1][0] = {}", d[1][0]);
    assert!(
        (d[1][1] - 2.0f64.sqrt()).abs() < 1e-12,
        "L[1][1] = {}",
        d[1][1]
    );
    assert_eq!(d[0][1], 0.0, "L must be lower triangular");
}

#[test]
fn test_numeric_columns_sorted_diag_first() {
    let a = tridiagonal_spd(4);
    let mut ws = Workspace::new(4);
    let sym = symbolic_cholesky(&a, &mut ws);
    let mut l = CscMatrix::zero(4, 4);
    assert_eq!(numeric_cholesky(&a, &sym, &mut l, &mut ws), 0);
    for j in 0..4 {
        let r = l.col_range(j);
        assert_eq!(l.row_idx[r.start], j as i64, "diagonal first in column {}", j);
        for p in r.start..r.end.saturating_sub(1) {
            assert!(l.row_idx[p] < l.row_idx[p + 1], "column {} unsorted", j);
        }
    }
}

#[test]
fn test_numeric_round_trip_with_fill() {
    // arrow matrix, diagonally dominant: factor produces fill in every
    // trailing column
    let a = CscMatrix::new(
        4,
        4,
        vec![0, 4, 6, 8, 10],
        vec![0, 1, 2, 3, 0, 1, 0, 2, 0, 3],
        vec![10.0, 1.0, 1.0, 1.0, 1.0, 10.0, 1.0, 10.0, 1.0, 10.0],
    );
    let mut ws = Workspace::new(4);
    let sym = symbolic_cholesky(&a, &mut ws);
    let mut l = CscMatrix::zero(4, 4);
    assert_eq!(numeric_cholesky(&a, &sym, &mut l, &mut ws), 0);
    assert_eq!(l.nnz(), sym.nnz, "numeric must fill the symbolic count exactly");
    check_llt(&l, &a, 1e-10);
}

#[test]
fn test_numeric_tridiagonal_round_trip() {
    let a = tridiagonal_spd(6);
    let mut ws = Workspace::new(6);
    let sym = symbolic_cholesky(&a, &mut ws);
    let mut l = CscMatrix::zero(6, 6);
    assert_eq!(numeric_cholesky(&a, &sym, &mut l, &mut ws), 0);
    check_llt(&l, &a, 1e-10);
}

#[test]
fn test_numeric_rejects_indefinite_matrix() {
    // [ 1 2 ]
    // [ 2 1 ]  has a negative eigenvalue
    let a = CscMatrix::new(
        2,
        2,
        vec![0, 2, 4],
        vec![0, 1, 0, 1],
        vec![1.0, 2.0, 2.0, 1.0],
    );
    let mut ws = Workspace::new(2);
    let sym = symbolic_cholesky(&a, &mut ws);
    let mut l = CscMatrix::zero(2, 2);
    assert_eq!(numeric_cholesky(&a, &sym, &mut l, &mut ws), -1);
}

#[test]
fn test_numeric_rejects_zero_diagonal() {
    let a = CscMatrix::new(1, 1, vec![0, 1], vec![0], vec![0.0]);
    let mut ws = Workspace::new(1);
    let sym = symbolic_cholesky(&a, &mut ws);
    let mut l = CscMatrix::zero(1, 1);
    assert_eq!(numeric_cholesky(&a, &sym, &mut l, &mut ws), -1);
}
