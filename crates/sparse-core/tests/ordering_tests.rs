//! Tests for the fill-reducing and bandwidth-reducing orderings.

use sparse_core::ordering::{invert_permutation, min_degree_order, rcm_order};
use sparse_core::CscMatrix;

fn assert_is_permutation(perm: &[i64], n: usize) {
    assert_eq!(perm.len(), n);
    let mut seen = vec![false; n];
    for &p in perm {
        assert!(p >= 0 && (p as usize) < n, "index {} out of range", p);
        assert!(!seen[p as usize], "duplicate index {}", p);
        seen[p as usize] = true;
    }
}

/// Star pattern: node 0 adjacent to every other node.
fn star(n: usize) -> CscMatrix {
    let mut col_ptr = vec![0i64];
    let mut row_idx = Vec::new();
    let mut values = Vec::new();
    // column 0: full
    for i in 0..n {
        row_idx.push(i as i64);
        values.push(1.0);
    }
    col_ptr.push(row_idx.len() as i64);
    // column j: rows 0 and j
    for j in 1..n {
        row_idx.push(0);
        values.push(1.0);
        row_idx.push(j as i64);
        values.push(1.0);
        col_ptr.push(row_idx.len() as i64);
    }
    CscMatrix::new(n, n, col_ptr, row_idx, values)
}

/// Path pattern: tridiagonal without numeric meaning.
fn path(n: usize) -> CscMatrix {
    let mut col_ptr = vec![0i64];
    let mut row_idx = Vec::new();
    let mut values = Vec::new();
    for j in 0..n {
        if j > 0 {
            row_idx.push(j as i64 - 1);
            values.push(1.0);
        }
        row_idx.push(j as i64);
        values.push(1.0);
        if j + 1 < n {
            row_idx.push(j as i64 + 1);
            values.push(1.0);
        }
        col_ptr.push(row_idx.len() as i64);
    }
    CscMatrix::new(n, n, col_ptr, row_idx, values)
}

// ============================================================================
// Minimum degree
// ============================================================================

#[test]
fn test_min_degree_is_a_permutation() {
    let a = star(6);
    let perm = min_degree_order(&a);
    assert_is_permutation(&perm, 6);
}

#[test]
fn test_min_degree_star_defers_the_hub() {
    // leaves have degree 1, the hub degree n-1: the hub cannot be picked
    // while more than one leaf survives (it ties with the final leaf and
    // wins that tie on index, so it lands second to last)
    let a = star(7);
    let perm = min_degree_order(&a);
    assert!(
        !perm[..5].contains(&0),
        "hub eliminated too early: {:?}",
        perm
    );
    assert_eq!(perm[5], 0, "hub wins the final tie on index, got {:?}", perm);
}

#[test]
fn test_min_degree_empty_pattern() {
    let a = CscMatrix::zero(4, 4);
    let perm = min_degree_order(&a);
    assert_is_permutation(&perm, 4);
}

// ============================================================================
// Reverse Cuthill-McKee
// ============================================================================

#[test]
fn test_rcm_is_a_permutation() {
    let a = star(5);
    let perm = rcm_order(&a);
    assert_is_permutation(&perm, 5);
}

#[test]
fn test_rcm_path_keeps_bandwidth_one() {
    let a = path(8);
    let perm = rcm_order(&a);
    assert_is_permutation(&perm, 8);
    let pinv = invert_permutation(&perm);
    // every edge (i, i+1) of the path must stay adjacent after relabeling
    for i in 0..7 {
        let d = (pinv[i] - pinv[i + 1]).abs();
        assert_eq!(d, 1, "edge ({}, {}) stretched to distance {}", i, i + 1, d);
    }
}

#[test]
fn test_rcm_covers_disconnected_components() {
    // two separate edges: 0-1 and 2-3
    let a = CscMatrix::new(
        4,
        4,
        vec![0, 1, 2, 3, 4],
        vec![1, 0, 3, 2],
        vec![1.0; 4],
    );
    let perm = rcm_order(&a);
    assert_is_permutation(&perm, 4);
}

// ============================================================================
// Inversion
// ============================================================================

#[test]
fn test_invert_permutation_round_trip() {
    let perm = vec![2i64, 0, 3, 1];
    let pinv = invert_permutation(&perm);
    assert_eq!(pinv, vec![1, 3, 0, 2]);
    for (i, &p) in perm.iter().enumerate() {
        assert_eq!(pinv[p as usize], i as i64);
    }
    assert_eq!(invert_permutation(&pinv), perm);
}
