//! # fvm1d
//!
//! A finite-volume engine for the steady one-dimensional boundary-value problem
//!
//! ```text
//! -a·u'' + b·u' + c·u = f(x)   on (0, L),   u(0) = u0,   u(L) = uL
//! ```
//!
//! with `a >= 0` acting as a diffusivity, `b` a convective velocity and `c` a
//! reaction coefficient.
//!
//! This library provides:
//! - Cell-centred mesh generation (uniform or clustered toward both walls)
//! - Tridiagonal assembly with an upwind convective split
//! - Direct (Thomas) and iterative (Gauss-Seidel / SOR) linear solves
//! - Solution interpolation, error norms, convergence studies and Péclet-based
//!   stability diagnostics
//!
//! ## Architecture
//!
//! - [`problem`] - Problem definition and validation
//! - [`mesh`] - Cell centres and widths
//! - [`solver`] - System assembly, linear solvers and the solve driver
//! - [`solution`] - Computed values with the mesh that produced them
//! - [`analysis`] - Error metrics, convergence order, stability reports
//! - [`method`] - Capability interface shared with other numerical methods
//!
//! ## Usage
//!
//! ```no_run
//! use fvm1d::{FiniteVolumeSolver, Problem, SolverConfig};
//!
//! let problem = Problem::builder()
//!     .coefficients(1.0, 0.0, 0.0)
//!     .boundary_values(0.0, 1.0)
//!     .cells(50)
//!     .build()?;
//!
//! let outcome = FiniteVolumeSolver::new(SolverConfig::default()).solve(&problem)?;
//! println!("u(0.5) = {}", outcome.solution.interpolate(0.5));
//! # Ok::<(), fvm1d::Fvm1dError>(())
//! ```
//!
//! ## Discretization
//!
//! For each cell the equation is integrated over the control volume. Face
//! conductances combine a diffusive part `a/distance` with the upwind share of
//! the convective flux, which keeps every off-diagonal coefficient
//! non-positive and the matrix diagonally dominant for `c >= 0`. Dirichlet
//! values enter through the half-cell wall conductance of the first and last
//! rows; no ghost nodes are created.

pub mod analysis;
pub mod error;
pub mod mesh;
pub mod method;
pub mod problem;
pub mod solution;
pub mod solver;

// Re-export main types for convenience
pub use error::{Fvm1dError, Result};
pub use mesh::{Mesh, MeshKind};
pub use method::{FiniteVolume1D, ResolutionMethod};
pub use problem::{Problem, ProblemBuilder};
pub use solution::Solution;
pub use solver::{FiniteVolumeSolver, SolveOutcome, SolverConfig, SolverStrategy};
