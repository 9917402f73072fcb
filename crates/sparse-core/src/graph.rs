//! Graph traversal kernels over the column-adjacency graph.
//!
//! A CSC matrix `G` induces a directed graph: node `j` has an edge to every
//! row index stored in column `j`. Depth-first search over this graph, and
//! the reachability sets it produces, are the primitive behind both the
//! sparse triangular solve and the LU pattern computation: they identify
//! exactly which entries of a mostly-zero dense vector a solve will touch,
//! so the numeric phase never scans the full vector.
//!
//! The DFS is iterative with an explicit stack. One length-`n` buffer
//! doubles as the DFS stack (growing up from offset 0) and the output
//! stack (filled downward from `top`); a parallel cursor buffer remembers
//! each stacked node's position in its edge list so a node's neighbors are
//! never rescanned from the start. The two ends can never collide because
//! a node is either unfinished (DFS stack) or emitted (output), never both.
//!
//! # References
//!
//! - Gilbert, J.R., Peierls, T. "Sparse partial pivoting in time
//!   proportional to arithmetic operations", SIAM J. Sci. Stat. Comput., 1988.
//! - Davis, T.A. "Direct Methods for Sparse Linear Systems", SIAM, 2006,
//!   Chapter 4: graph algorithms for the solve phase.

use crate::csc::CscMatrix;
use crate::workspace::Workspace;

/// Iterative depth-first search from `start` over the graph `(col_ptr, row_idx)`.
///
/// Emitted nodes are written into `stack[top-1], stack[top-2], ..` (the
/// output grows downward); the new `top` is returned, so successive calls
/// compose without copying. `cursor` must be at least as long as `stack`.
///
/// Visited nodes are recorded in `marked` and deliberately left set: callers
/// composing multiple searches (see [`reach`]) rely on earlier marks to skip
/// already-collected subtrees, and clear the marks themselves afterwards.
///
/// When `pinv` is given, node `j` explores the edges of column `pinv[j]`; a
/// negative mapped index means the node has no outgoing edges (it is outside
/// the active submatrix), which terminates that branch silently.
pub fn dfs(
    start: usize,
    col_ptr: &[i64],
    row_idx: &[i64],
    mut top: usize,
    stack: &mut [i64],
    cursor: &mut [i64],
    marked: &mut [bool],
    pinv: Option<&[i64]>,
) -> usize {
    let mut head: isize = 0;
    stack[0] = start as i64;
    while head >= 0 {
        let h = head as usize;
        let j = stack[h] as usize;
        let jmapped = match pinv {
            Some(p) => p[j],
            None => j as i64,
        };
        if !marked[j] {
            marked[j] = true;
            cursor[h] = if jmapped < 0 {
                0
            } else {
                col_ptr[jmapped as usize]
            };
        }
        let p_end = if jmapped < 0 {
            0
        } else {
            col_ptr[jmapped as usize + 1]
        };
        let mut done = true;
        let mut p = cursor[h];
        while p < p_end {
            let i = row_idx[p as usize] as usize;
            if marked[i] {
                p += 1;
                continue;
            }
            // descend; resume this node's edge scan here on the way back up
            cursor[h] = p;
            head += 1;
            stack[head as usize] = i as i64;
            done = false;
            break;
        }
        if done {
            head -= 1;
            top -= 1;
            stack[top] = j as i64;
        }
    }
    top
}

/// Nodes of `g` reachable from the nonzero rows of `b`'s column `k`.
///
/// The combined output occupies `ws.idx[top..g.cols]` (see
/// [`Workspace::pattern`]) in dependency order: a node appears before every
/// node its column's entries point at, which is exactly the order a sparse
/// triangular solve must process. Returns `top`.
///
/// Marks set during the traversal are cleared before returning, so `reach`
/// leaves the workspace ready for the next call.
pub fn reach(
    g: &CscMatrix,
    b: &CscMatrix,
    k: usize,
    ws: &mut Workspace,
    pinv: Option<&[i64]>,
) -> usize {
    let n = g.cols;
    let (stack, rest) = ws.idx.split_at_mut(n);
    let cursor = &mut rest[..n];
    let marked = &mut ws.flag;
    let mut top = n;
    for p in b.col_range(k) {
        let i = b.row_idx[p] as usize;
        if !marked[i] {
            top = dfs(i, &g.col_ptr, &g.row_idx, top, stack, cursor, marked, pinv);
        }
    }
    for px in top..n {
        marked[stack[px] as usize] = false;
    }
    top
}
