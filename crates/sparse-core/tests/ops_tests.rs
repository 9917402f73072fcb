//! Tests for the structural operations: transpose, permute, multiply.

use sparse_core::ops::{multiply, multiply_nnz_upper_bound, permute, transpose};
use sparse_core::{CscMatrix, Workspace};

// ============================================================================
// Helpers
// ============================================================================

fn to_dense(a: &CscMatrix) -> Vec<Vec<f64>> {
    let mut d = vec![vec![0.0; a.cols]; a.rows];
    for j in 0..a.cols {
        for p in a.col_range(j) {
            d[a.row_idx[p] as usize][j] += a.values[p];
        }
    }
    d
}

fn dense_eq(a: &[Vec<f64>], b: &[Vec<f64>], tol: f64) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(ra, rb)| ra.iter().zip(rb).all(|(x, y)| (x - y).abs() <= tol))
}

// ============================================================================
// Transpose
// ============================================================================

#[test]
fn test_transpose_rectangular() {
    // [ 1 0 2 ]
    // [ 0 3 0 ]
    let a = CscMatrix::new(2, 3, vec![0, 1, 2, 3], vec![0, 1, 0], vec![1.0, 3.0, 2.0]);
    let t = transpose(&a);
    assert_eq!(t.rows, 3);
    assert_eq!(t.cols, 2);
    let d = to_dense(&t);
    let expected = vec![vec![1.0, 0.0], vec![0.0, 3.0], vec![2.0, 0.0]];
    assert!(dense_eq(&d, &expected, 0.0), "transpose mismatch: {:?}", d);
}

#[test]
fn test_transpose_involution() {
    let a = CscMatrix::new(
        3,
        3,
        vec![0, 2, 4, 6],
        vec![0, 2, 1, 2, 0, 1],
        vec![1.0, -2.0, 3.0, 4.5, 0.5, -1.0],
    );
    let tt = transpose(&transpose(&a));
    assert!(
        dense_eq(&to_dense(&tt), &to_dense(&a), 0.0),
        "double transpose should reproduce the matrix"
    );
    assert_eq!(tt.nnz(), a.nnz());
}

#[test]
fn test_transpose_sorts_columns() {
    // column with out-of-order rows
    let a = CscMatrix::new(3, 1, vec![0, 3], vec![2, 0, 1], vec![3.0, 1.0, 2.0]);
    let sorted = transpose(&transpose(&a));
    assert_eq!(sorted.row_idx, vec![0, 1, 2]);
    assert_eq!(sorted.values, vec![1.0, 2.0, 3.0]);
}

// ============================================================================
// Permute
// ============================================================================

#[test]
fn test_permute_identity() {
    let a = CscMatrix::new(2, 2, vec![0, 2, 3], vec![0, 1, 1], vec![1.0, 2.0, 3.0]);
    let c = permute(&a, None, None);
    assert!(dense_eq(&to_dense(&c), &to_dense(&a), 0.0));
}

#[test]
fn test_permute_rows_and_columns() {
    // [ 1 2 ]
    // [ 3 4 ]
    let a = CscMatrix::new(
        2,
        2,
        vec![0, 2, 4],
        vec![0, 1, 0, 1],
        vec![1.0, 3.0, 2.0, 4.0],
    );
    // swap both rows and columns: C[pinv[i], k] = A[i, q[k]]
    let pinv = vec![1i64, 0];
    let q = vec![1i64, 0];
    let c = permute(&a, Some(&pinv), Some(&q));
    let expected = vec![vec![4.0, 3.0], vec![2.0, 1.0]];
    assert!(
        dense_eq(&to_dense(&c), &expected, 0.0),
        "permuted matrix mismatch: {:?}",
        to_dense(&c)
    );
}

// ============================================================================
// Multiply
// ============================================================================

#[test]
fn test_multiply_small() {
    // [ 1 2 ]   [ 5 6 ]   [ 19 22 ]
    // [ 3 4 ] · [ 7 8 ] = [ 43 50 ]
    let a = CscMatrix::new(
        2,
        2,
        vec![0, 2, 4],
        vec![0, 1, 0, 1],
        vec![1.0, 3.0, 2.0, 4.0],
    );
    let b = CscMatrix::new(
        2,
        2,
        vec![0, 2, 4],
        vec![0, 1, 0, 1],
        vec![5.0, 7.0, 6.0, 8.0],
    );
    let mut ws = Workspace::new(2);
    let c = multiply(&a, &b, &mut ws);
    let expected = vec![vec![19.0, 22.0], vec![43.0, 50.0]];
    assert!(
        dense_eq(&to_dense(&c), &expected, 1e-12),
        "product mismatch: {:?}",
        to_dense(&c)
    );
}

#[test]
fn test_multiply_by_identity() {
    let a = CscMatrix::new(3, 3, vec![0, 1, 3, 4], vec![1, 0, 2, 1], vec![2.0, 3.0, 4.0, 5.0]);
    let eye = CscMatrix::new(
        3,
        3,
        vec![0, 1, 2, 3],
        vec![0, 1, 2],
        vec![1.0, 1.0, 1.0],
    );
    let mut ws = Workspace::new(3);
    let c = multiply(&a, &eye, &mut ws);
    assert!(dense_eq(&to_dense(&c), &to_dense(&a), 0.0));
    let c2 = multiply(&eye, &a, &mut ws);
    assert!(dense_eq(&to_dense(&c2), &to_dense(&a), 0.0));
}

#[test]
fn test_multiply_associativity() {
    let a = CscMatrix::new(2, 3, vec![0, 1, 3, 4], vec![0, 0, 1, 1], vec![1.0, 2.0, 3.0, 4.0]);
    let b = CscMatrix::new(3, 2, vec![0, 2, 3], vec![0, 2, 1], vec![0.5, -1.0, 2.0]);
    let c = CscMatrix::new(2, 2, vec![0, 2, 3], vec![0, 1, 0], vec![1.0, 1.0, -2.0]);
    let mut ws = Workspace::new(3);
    let left = multiply(&multiply(&a, &b, &mut ws), &c, &mut ws);
    let right = multiply(&a, &multiply(&b, &c, &mut ws), &mut ws);
    assert!(
        dense_eq(&to_dense(&left), &to_dense(&right), 1e-12),
        "(A·B)·C != A·(B·C)"
    );
}

#[test]
fn test_multiply_cancellation_keeps_structural_zero() {
    // entries that sum to exactly zero stay in the pattern
    let a = CscMatrix::new(1, 2, vec![0, 1, 2], vec![0, 0], vec![1.0, -1.0]);
    let b = CscMatrix::new(2, 1, vec![0, 2], vec![0, 1], vec![1.0, 1.0]);
    let mut ws = Workspace::new(1);
    let c = multiply(&a, &b, &mut ws);
    assert_eq!(c.nnz(), 1, "cancelled entry should remain stored");
    assert_eq!(c.values[0], 0.0);
}

#[test]
fn test_multiply_nnz_bound_never_underestimates() {
    let a = CscMatrix::new(3, 3, vec![0, 2, 4, 6], vec![0, 1, 1, 2, 0, 2], vec![1.0; 6]);
    let b = CscMatrix::new(3, 3, vec![0, 2, 4, 6], vec![0, 2, 0, 1, 1, 2], vec![1.0; 6]);
    let mut ws = Workspace::new(3);
    let c = multiply(&a, &b, &mut ws);
    let bound = multiply_nnz_upper_bound(&a, &b);
    assert!(
        bound >= c.nnz(),
        "bound {} below actual nnz {}",
        bound,
        c.nnz()
    );
}
