//! High-level direct solvers wrapping the factorization kernels.
//!
//! [`LuSolver`] and [`CholeskySolver`] own their workspace and factors so
//! that a matrix factored once can be solved against many right-hand
//! sides, the usual shape of a Newton or transient loop. Fill-reducing
//! orderings are applied here, not in the kernels: the kernels factor
//! exactly the matrix they are given.

use crate::cholesky::{numeric_cholesky, symbolic_cholesky, SymbolicCholesky};
use crate::csc::CscMatrix;
use crate::lu::{lu_factor, LuFactors};
use crate::ops::cumsum;
use crate::ordering::{invert_permutation, min_degree_order, rcm_order};
use crate::workspace::Workspace;

// ============================================================
// Errors
// ============================================================

/// Factorization and solve failures.
#[derive(Debug, Clone, PartialEq)]
pub enum FactorError {
    /// Cholesky hit a non-positive pivot; the matrix is not positive
    /// definite (or not symmetric).
    NotPositiveDefinite,
    /// LU found no usable pivot in this column; the matrix is singular.
    StructurallySingular { column: usize },
    /// Matrix or right-hand side dimensions do not match the solver.
    DimensionMismatch { expected: usize, found: usize },
    /// `solve` was called before a successful `factor`.
    NotFactored,
}

impl std::fmt::Display for FactorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FactorError::NotPositiveDefinite => {
                write!(f, "matrix is not positive definite")
            }
            FactorError::StructurallySingular { column } => {
                write!(f, "matrix is singular: no pivot in column {}", column)
            }
            FactorError::DimensionMismatch { expected, found } => {
                write!(f, "dimension mismatch: expected {}, found {}", expected, found)
            }
            FactorError::NotFactored => {
                write!(f, "solve called before a successful factorization")
            }
        }
    }
}

impl std::error::Error for FactorError {}

// ============================================================
// Orderings
// ============================================================

/// Fill-reducing ordering applied before factorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OrderingChoice {
    /// Factor the matrix as given.
    Natural,
    /// Greedy minimum-degree on the symmetrized pattern.
    #[default]
    MinDegree,
    /// Reverse Cuthill-McKee, profile-reducing.
    Rcm,
}

impl OrderingChoice {
    fn compute(self, a: &CscMatrix) -> Option<Vec<i64>> {
        match self {
            OrderingChoice::Natural => None,
            OrderingChoice::MinDegree => Some(min_degree_order(a)),
            OrderingChoice::Rcm => Some(rcm_order(a)),
        }
    }
}

/// Size counters from the last successful factorization.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FactorStats {
    pub l_nnz: usize,
    pub u_nnz: usize,
}

// ============================================================
// LU solver
// ============================================================

/// Sparse LU solver with threshold partial pivoting.
///
/// ```ignore
/// let mut solver = LuSolver::new(n);
/// solver.factor(&a)?;
/// solver.solve(&mut b)?;   // b now holds x
/// ```
pub struct LuSolver {
    n: usize,
    tol: f64,
    ordering: OrderingChoice,
    q: Option<Vec<i64>>,
    factors: Option<LuFactors>,
    ws: Workspace,
    stats: FactorStats,
}

impl LuSolver {
    /// New solver for `n × n` systems, default pivot tolerance 1.0
    /// (strict partial pivoting) and minimum-degree ordering.
    pub fn new(n: usize) -> Self {
        LuSolver {
            n,
            tol: 1.0,
            ordering: OrderingChoice::default(),
            q: None,
            factors: None,
            ws: Workspace::new(n),
            stats: FactorStats::default(),
        }
    }

    /// Relative pivot threshold in `(0, 1]`. Smaller values favor
    /// sparsity over numerical safety.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn with_ordering(mut self, ordering: OrderingChoice) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn stats(&self) -> FactorStats {
        self.stats
    }

    /// Factor `a`. Replaces any previous factorization.
    pub fn factor(&mut self, a: &CscMatrix) -> Result<(), FactorError> {
        if !a.is_square() || a.rows != self.n {
            return Err(FactorError::DimensionMismatch {
                expected: self.n,
                found: a.rows,
            });
        }
        self.ws.ensure(self.n);
        self.q = self.ordering.compute(a);
        let (status, factors) = lu_factor(a, self.q.as_deref(), self.tol, &mut self.ws);
        match factors {
            Some(fac) => {
                self.stats = FactorStats {
                    l_nnz: fac.l.nnz(),
                    u_nnz: fac.u.nnz(),
                };
                log::debug!(
                    "lu factor: n={} l_nnz={} u_nnz={}",
                    self.n,
                    self.stats.l_nnz,
                    self.stats.u_nnz
                );
                self.factors = Some(fac);
                Ok(())
            }
            None => {
                self.factors = None;
                Err(FactorError::StructurallySingular {
                    column: (-status - 1) as usize,
                })
            }
        }
    }

    /// Solve `A·x = b` in place: `rhs` holds `b` on entry and `x` on
    /// return.
    pub fn solve(&self, rhs: &mut [f64]) -> Result<(), FactorError> {
        let fac = self.factors.as_ref().ok_or(FactorError::NotFactored)?;
        if rhs.len() != self.n {
            return Err(FactorError::DimensionMismatch {
                expected: self.n,
                found: rhs.len(),
            });
        }
        let n = self.n;
        let mut tmp = vec![0.0f64; n];
        // apply the row permutation, b -> P·b
        for i in 0..n {
            tmp[fac.pinv[i] as usize] = rhs[i];
        }
        lower_solve_unit_diag(&fac.l, &mut tmp);
        upper_solve_diag_last(&fac.u, &mut tmp);
        // undo the column permutation
        match &self.q {
            Some(q) => {
                for k in 0..n {
                    rhs[q[k] as usize] = tmp[k];
                }
            }
            None => rhs.copy_from_slice(&tmp),
        }
        Ok(())
    }
}

// ============================================================
// Cholesky solver
// ============================================================

/// Sparse Cholesky solver for symmetric positive definite systems.
///
/// The symbolic analysis from the last factorization is retained and can
/// be inspected through [`CholeskySolver::symbolic`] even when the
/// numeric phase fails.
pub struct CholeskySolver {
    n: usize,
    ordering: OrderingChoice,
    perm: Option<Vec<i64>>,
    symbolic: Option<SymbolicCholesky>,
    l: CscMatrix,
    factored: bool,
    ws: Workspace,
    stats: FactorStats,
}

impl CholeskySolver {
    pub fn new(n: usize) -> Self {
        CholeskySolver {
            n,
            ordering: OrderingChoice::default(),
            perm: None,
            symbolic: None,
            l: CscMatrix::zero(n, n),
            factored: false,
            ws: Workspace::new(n),
            stats: FactorStats::default(),
        }
    }

    pub fn with_ordering(mut self, ordering: OrderingChoice) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn stats(&self) -> FactorStats {
        self.stats
    }

    /// Elimination tree and column counts from the last factorization
    /// attempt, if any.
    pub fn symbolic(&self) -> Option<&SymbolicCholesky> {
        self.symbolic.as_ref()
    }

    /// Factor `a`, which must be symmetric positive definite with its
    /// upper triangle stored (the lower triangle is ignored).
    pub fn factor(&mut self, a: &CscMatrix) -> Result<(), FactorError> {
        if !a.is_square() || a.rows != self.n {
            return Err(FactorError::DimensionMismatch {
                expected: self.n,
                found: a.rows,
            });
        }
        self.ws.ensure(self.n);
        self.factored = false;
        self.perm = self.ordering.compute(a);
        let c = match &self.perm {
            Some(perm) => {
                let pinv = invert_permutation(perm);
                symmetric_upper_permute(a, perm, &pinv)
            }
            None => a.clone(),
        };
        // symbolic analysis is pattern-only; redo it per call since the
        // ordering may have changed
        let sym = symbolic_cholesky(&c, &mut self.ws);
        let status = numeric_cholesky(&c, &sym, &mut self.l, &mut self.ws);
        if status < 0 {
            self.symbolic = Some(sym);
            return Err(FactorError::NotPositiveDefinite);
        }
        self.stats = FactorStats {
            l_nnz: self.l.nnz(),
            u_nnz: 0,
        };
        log::debug!("cholesky factor: n={} l_nnz={}", self.n, self.stats.l_nnz);
        self.symbolic = Some(sym);
        self.factored = true;
        Ok(())
    }

    /// Solve `A·x = b` in place.
    pub fn solve(&self, rhs: &mut [f64]) -> Result<(), FactorError> {
        if !self.factored {
            return Err(FactorError::NotFactored);
        }
        if rhs.len() != self.n {
            return Err(FactorError::DimensionMismatch {
                expected: self.n,
                found: rhs.len(),
            });
        }
        let n = self.n;
        let mut tmp = vec![0.0f64; n];
        match &self.perm {
            Some(perm) => {
                for k in 0..n {
                    tmp[k] = rhs[perm[k] as usize];
                }
            }
            None => tmp.copy_from_slice(rhs),
        }
        lower_solve_diag_first(&self.l, &mut tmp);
        lower_transpose_solve(&self.l, &mut tmp);
        match &self.perm {
            Some(perm) => {
                for k in 0..n {
                    rhs[perm[k] as usize] = tmp[k];
                }
            }
            None => rhs.copy_from_slice(&tmp),
        }
        Ok(())
    }
}

/// Permute the upper triangle of a symmetric matrix: the result holds
/// the upper triangle of `Pᵀ·A·P` in position space `perm` (new -> old).
/// An entry landing below the new diagonal is flipped back above it.
fn symmetric_upper_permute(a: &CscMatrix, perm: &[i64], pinv: &[i64]) -> CscMatrix {
    let n = a.cols;
    let mut c = CscMatrix::with_capacity(n, n, a.nnz());
    let mut count = vec![0i64; n];
    // count entries per new column
    for k in 0..n {
        let j = perm[k] as usize;
        for p in a.col_range(j) {
            let i = a.row_idx[p] as usize;
            if i > j {
                continue;
            }
            let inew = pinv[i];
            count[k.max(inew as usize)] += 1;
        }
    }
    let nnz = cumsum(&mut c.col_ptr, &mut count);
    c.row_idx.resize(nnz, 0);
    c.values.resize(nnz, 0.0);
    for k in 0..n {
        let j = perm[k] as usize;
        for p in a.col_range(j) {
            let i = a.row_idx[p] as usize;
            if i > j {
                continue;
            }
            let inew = pinv[i] as usize;
            let col = k.max(inew);
            let row = k.min(inew);
            let q = count[col] as usize;
            count[col] += 1;
            c.row_idx[q] = row as i64;
            c.values[q] = a.values[p];
        }
    }
    c
}

fn lower_solve_unit_diag(l: &CscMatrix, x: &mut [f64]) {
    for j in 0..l.cols {
        let xj = x[j];
        if xj == 0.0 {
            continue;
        }
        for p in l.col_ptr[j] as usize + 1..l.col_ptr[j + 1] as usize {
            x[l.row_idx[p] as usize] -= l.values[p] * xj;
        }
    }
}

fn lower_solve_diag_first(l: &CscMatrix, x: &mut [f64]) {
    for j in 0..l.cols {
        let ps = l.col_ptr[j] as usize;
        let pe = l.col_ptr[j + 1] as usize;
        x[j] /= l.values[ps];
        let xj = x[j];
        for p in ps + 1..pe {
            x[l.row_idx[p] as usize] -= l.values[p] * xj;
        }
    }
}

/// Solve `Lᵀ·x = b` in dot-product form over the columns of `L`.
fn lower_transpose_solve(l: &CscMatrix, x: &mut [f64]) {
    for j in (0..l.cols).rev() {
        let ps = l.col_ptr[j] as usize;
        let pe = l.col_ptr[j + 1] as usize;
        let mut xj = x[j];
        for p in ps + 1..pe {
            xj -= l.values[p] * x[l.row_idx[p] as usize];
        }
        x[j] = xj / l.values[ps];
    }
}

fn upper_solve_diag_last(u: &CscMatrix, x: &mut [f64]) {
    for j in (0..u.cols).rev() {
        let ps = u.col_ptr[j] as usize;
        let pe = u.col_ptr[j + 1] as usize;
        x[j] /= u.values[pe - 1];
        let xj = x[j];
        for p in ps..pe - 1 {
            x[u.row_idx[p] as usize] -= u.values[p] * xj;
        }
    }
}
