//! Elimination tree, postorder, and row-subtree reachability.
//!
//! The elimination tree of a symmetric matrix records the structural
//! dependencies between columns of its Cholesky factor: column `j`'s
//! numeric values feed into column `parent[j]`'s, and into nothing else
//! directly. Computing the tree needs only the nonzero pattern of the
//! upper triangle, no numeric values.
//!
//! # Algorithm
//!
//! Columns are processed left to right. For each upper-triangle entry
//! `(i, k)` with `i < k`, the path from `i` toward the root is walked and
//! every unrooted node on it is adopted by `k`. The walk follows a
//! separate `ancestor` array rather than `parent` itself, collapsing each
//! traversed path onto its endpoint, which keeps repeated walks amortized
//! near O(1) (path compression).
//!
//! Because children always receive a larger-numbered parent, `parent[i] > i`
//! holds for every non-root node, which is what lets the factorizations
//! build the factor one column at a time left to right.
//!
//! # References
//!
//! - Liu, J.W.H. "The role of elimination trees in sparse factorization",
//!   SIAM J. Matrix Anal. Appl., Vol. 11, No. 1, pp. 134-172, 1990.
//! - Davis, T.A. "Direct Methods for Sparse Linear Systems", SIAM, 2006,
//!   Chapter 4: the elimination tree.

use crate::csc::CscMatrix;

/// Compute the elimination tree of a symmetric matrix from its upper
/// triangle.
///
/// `parent[i]` receives the structural parent of node `i`, or `-1` for a
/// root. `ancestor` is length-`n` scratch for the path compression; its
/// contents on return are meaningless.
///
/// Entries below the diagonal are ignored, so a full symmetric matrix may
/// be passed directly.
pub fn etree(a: &CscMatrix, parent: &mut [i64], ancestor: &mut [i64]) {
    let n = a.cols;
    for k in 0..n {
        parent[k] = -1;
        ancestor[k] = -1;
        for p in a.col_range(k) {
            let mut i = a.row_idx[p];
            while i != -1 && (i as usize) < k {
                let inext = ancestor[i as usize];
                ancestor[i as usize] = k as i64;
                if inext == -1 {
                    parent[i as usize] = k as i64;
                }
                i = inext;
            }
        }
    }
}

/// Postorder a forest: children strictly precede their parent in `post`.
///
/// Child lists are built by reverse-order insertion so that iteration
/// yields children in increasing index order, making the traversal
/// deterministic. The per-root walk is an iterative two-state DFS (push
/// children / emit self), never recursive. `work` must be length `3n`
/// (child heads, sibling links, traversal stack).
pub fn postorder(parent: &[i64], n: usize, post: &mut [i64], work: &mut [i64]) {
    let (head, rest) = work.split_at_mut(n);
    let (next, stack) = rest.split_at_mut(n);
    head[..n].fill(-1);
    for j in (0..n).rev() {
        if parent[j] == -1 {
            continue;
        }
        next[j] = head[parent[j] as usize];
        head[parent[j] as usize] = j as i64;
    }
    let mut k = 0usize;
    for j in 0..n {
        if parent[j] != -1 {
            continue;
        }
        k = tdfs(j, k, head, next, post, stack);
    }
}

/// Depth-first postorder of the subtree rooted at `j`; consumes the child
/// lists in `head` as it walks. Returns the next free slot in `post`.
fn tdfs(
    j: usize,
    mut k: usize,
    head: &mut [i64],
    next: &[i64],
    post: &mut [i64],
    stack: &mut [i64],
) -> usize {
    let mut top: isize = 0;
    stack[0] = j as i64;
    while top >= 0 {
        let p = stack[top as usize] as usize;
        let i = head[p];
        if i == -1 {
            // all children emitted; emit p itself
            top -= 1;
            post[k] = p as i64;
            k += 1;
        } else {
            head[p] = next[i as usize];
            top += 1;
            stack[top as usize] = i;
        }
    }
    k
}

/// Nonzero pattern of row `k` of the Cholesky factor, via the elimination
/// tree.
///
/// For each upper-triangle entry `(i, k)` of `a`, the tree is walked from
/// `i` up toward `k`, stopping at nodes already collected for this row.
/// The pattern lands in `stack[top..n]` in topological order (descendants
/// before ancestors), which is the order the up-looking numeric
/// factorization consumes it in. `stack` must be length `2n` (output plus
/// one path buffer); the marks set in `marked` are cleared before return.
pub fn ereach(
    a: &CscMatrix,
    k: usize,
    parent: &[i64],
    stack: &mut [i64],
    marked: &mut [bool],
) -> usize {
    let n = a.cols;
    let (out, path) = stack.split_at_mut(n);
    let mut top = n;
    marked[k] = true;
    for p in a.col_range(k) {
        let mut i = a.row_idx[p] as usize;
        if i > k {
            continue;
        }
        let mut len = 0usize;
        while !marked[i] {
            path[len] = i as i64;
            len += 1;
            marked[i] = true;
            let pi = parent[i];
            if pi < 0 {
                break;
            }
            i = pi as usize;
        }
        while len > 0 {
            len -= 1;
            top -= 1;
            out[top] = path[len];
        }
    }
    for px in top..n {
        marked[out[px] as usize] = false;
    }
    marked[k] = false;
    top
}
