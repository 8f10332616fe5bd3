//! Finite-volume solver.
//!
//! This module turns a [`Problem`](crate::Problem) into a
//! [`Solution`](crate::Solution):
//!
//! 1. Build the cell-centred mesh
//! 2. Assemble the tridiagonal system with upwind face conductances
//! 3. Solve it directly (Thomas) or iteratively (Gauss-Seidel / SOR)
//!
//! The system is
//! ```text
//! [ d0  u0                ] [ x0 ]   [ r0 ]
//! [ l0  d1  u1            ] [ x1 ]   [ r1 ]
//! [     l1  d2  u2        ] [ x2 ] = [ r2 ]
//! [          ...  ...  .. ] [ .. ]   [ .. ]
//! ```
//!
//! where every off-diagonal coefficient is non-positive and each diagonal
//! collects the face conductances of its cell plus the reaction term.

mod driver;
mod gauss_seidel;
mod system;
mod thomas;

pub use driver::{FiniteVolumeSolver, SolveOutcome, SolverConfig, SolverStrategy};
pub use gauss_seidel::{GaussSeidel, IterativeSolution};
pub use system::{assemble, TridiagonalSystem};
pub use thomas::solve_thomas;

/// Convergence tolerance on the max-norm change between sweeps.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Maximum number of iterative sweeps.
pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

/// Over-relaxation factor used by the SOR strategy.
pub const DEFAULT_RELAXATION: f64 = 1.8;

/// Largest cell count solved iteratively by the automatic strategy.
pub const DEFAULT_DIRECT_THRESHOLD: usize = 50;

/// Relative pivot magnitude below which elimination reports a singular system.
pub const PIVOT_TOLERANCE: f64 = 1e-14;
