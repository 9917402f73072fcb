//! Compressed Sparse Column (CSC) matrix storage.
//!
//! All kernels in this crate operate on the `(values, row_idx, col_ptr)`
//! triple. Column `j`'s entries occupy `row_idx[col_ptr[j]..col_ptr[j+1]]`
//! with parallel `values` at the same offsets. Row indices within a column
//! are not required to be sorted unless an operation documents otherwise;
//! in particular the triangular solves locate diagonals by linear scan.
//!
//! Indices are stored as `i64` so that `-1` sentinels (tree roots, unmatched
//! pivot rows, identity permutations) share the index type used everywhere
//! else in the kernel.

/// Sparse matrix in compressed sparse column format.
///
/// # Invariants
///
/// - `col_ptr.len() == cols + 1`, `col_ptr[0] == 0`, non-decreasing,
///   `col_ptr[cols] == nnz`
/// - `0 <= row_idx[p] < rows` for every valid offset `p`
///
/// These are debug-asserted at construction, never checked in release
/// builds: passing a malformed triple to a kernel is a caller-contract
/// violation, not a recoverable error.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CscMatrix {
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
    /// Column pointers, length `cols + 1`.
    pub col_ptr: Vec<i64>,
    /// Row indices, length `nnz`.
    pub row_idx: Vec<i64>,
    /// Numeric values, parallel to `row_idx`.
    pub values: Vec<f64>,
}

impl CscMatrix {
    /// Build a matrix from raw CSC arrays.
    pub fn new(
        rows: usize,
        cols: usize,
        col_ptr: Vec<i64>,
        row_idx: Vec<i64>,
        values: Vec<f64>,
    ) -> Self {
        debug_assert_eq!(col_ptr.len(), cols + 1);
        debug_assert_eq!(col_ptr[0], 0);
        debug_assert!(col_ptr.windows(2).all(|w| w[0] <= w[1]));
        debug_assert_eq!(col_ptr[cols] as usize, row_idx.len());
        debug_assert_eq!(row_idx.len(), values.len());
        debug_assert!(row_idx.iter().all(|&i| i >= 0 && (i as usize) < rows));
        Self {
            rows,
            cols,
            col_ptr,
            row_idx,
            values,
        }
    }

    /// An all-zero matrix of the given shape.
    pub fn zero(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            col_ptr: vec![0; cols + 1],
            row_idx: Vec::new(),
            values: Vec::new(),
        }
    }

    /// An empty matrix with entry storage reserved for `nzmax` nonzeros.
    ///
    /// Used by operations that build their output column by column
    /// (factorizations, permute, multiply).
    pub fn with_capacity(rows: usize, cols: usize, nzmax: usize) -> Self {
        Self {
            rows,
            cols,
            col_ptr: vec![0; cols + 1],
            row_idx: Vec::with_capacity(nzmax),
            values: Vec::with_capacity(nzmax),
        }
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.col_ptr[self.cols] as usize
    }

    /// Whether the matrix is square.
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Offset range of column `j`'s entries in `row_idx`/`values`.
    #[inline]
    pub fn col_range(&self, j: usize) -> core::ops::Range<usize> {
        self.col_ptr[j] as usize..self.col_ptr[j + 1] as usize
    }
}
