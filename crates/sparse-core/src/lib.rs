//! Sparse direct linear algebra kernels over compressed sparse column
//! matrices.
//!
//! The crate is organized in two layers:
//!
//! - **Kernels**: raw algorithms operating on [`CscMatrix`] plus a
//!   caller-owned [`Workspace`] — graph reachability ([`graph`]),
//!   elimination trees ([`etree`]), fill-reducing orderings
//!   ([`ordering`]), pattern-restricted triangular solves ([`trisolve`]),
//!   and the Cholesky ([`cholesky`]), LU ([`lu`]) and QR ([`qr`])
//!   factorizations, along with structural operations ([`ops`]). Kernels
//!   never allocate scratch and signal numeric failure through status
//!   codes.
//! - **Solvers**: [`solver::LuSolver`] and [`solver::CholeskySolver`]
//!   wrap the kernels with orderings, workspace management, and `Result`
//!   based error reporting for factor-once/solve-many use.
//!
//! # Example
//!
//! ```ignore
//! use sparse_core::{CscMatrix, solver::LuSolver};
//!
//! // [ 2  1 ]       [ 5 ]
//! // [ 1  3 ] · x = [ 10 ]
//! let a = CscMatrix::new(2, 2, vec![0, 2, 4], vec![0, 1, 0, 1],
//!                        vec![2.0, 1.0, 1.0, 3.0]);
//! let mut solver = LuSolver::new(2);
//! solver.factor(&a)?;
//! let mut x = vec![5.0, 10.0];
//! solver.solve(&mut x)?;
//! ```

pub mod cholesky;
pub mod csc;
pub mod etree;
pub mod graph;
pub mod lu;
pub mod ops;
pub mod ordering;
pub mod qr;
pub mod solver;
pub mod trisolve;
pub mod workspace;

pub use csc::CscMatrix;
pub use workspace::Workspace;
