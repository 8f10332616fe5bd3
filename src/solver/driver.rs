//! Solve driver: configuration, strategy selection and the full pipeline.

use std::fmt;
use std::time::{Duration, Instant};

use crate::analysis::StabilityReport;
use crate::error::{Fvm1dError, Result};
use crate::mesh::Mesh;
use crate::problem::{validate_problem, Problem};
use crate::solution::Solution;

use super::gauss_seidel::GaussSeidel;
use super::system::{assemble, TridiagonalSystem};
use super::thomas::solve_thomas;
use super::{
    DEFAULT_DIRECT_THRESHOLD, DEFAULT_MAX_ITERATIONS, DEFAULT_RELAXATION, DEFAULT_TOLERANCE,
};

/// Linear solve strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SolverStrategy {
    /// Gauss-Seidel up to the direct threshold, Thomas above it
    #[default]
    Auto,
    /// Direct tridiagonal elimination
    Thomas,
    /// Plain Gauss-Seidel (ω = 1)
    GaussSeidel,
    /// Successive over-relaxation with the configured ω
    Sor,
}

impl fmt::Display for SolverStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SolverStrategy::Auto => "auto",
            SolverStrategy::Thomas => "thomas",
            SolverStrategy::GaussSeidel => "gauss-seidel",
            SolverStrategy::Sor => "sor",
        };
        f.write_str(name)
    }
}

/// Configuration for the solver.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Which linear solver to run.
    pub strategy: SolverStrategy,
    /// Largest cell count the automatic strategy solves iteratively.
    pub direct_threshold: usize,
    /// Max-norm change between sweeps that ends an iterative solve.
    pub tolerance: f64,
    /// Iteration cap for iterative solves.
    pub max_iterations: usize,
    /// Over-relaxation factor ω for [`SolverStrategy::Sor`].
    pub relaxation: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            strategy: SolverStrategy::Auto,
            direct_threshold: DEFAULT_DIRECT_THRESHOLD,
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            relaxation: DEFAULT_RELAXATION,
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the solve strategy.
    pub fn with_strategy(mut self, strategy: SolverStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the cell count up to which [`SolverStrategy::Auto`] iterates.
    pub fn with_direct_threshold(mut self, direct_threshold: usize) -> Self {
        self.direct_threshold = direct_threshold;
        self
    }

    /// Set the iterative convergence tolerance.
    ///
    /// Callers with a wall-clock budget should lower the iteration cap rather
    /// than loosen this.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the SOR relaxation factor.
    pub fn with_relaxation(mut self, relaxation: f64) -> Self {
        self.relaxation = relaxation;
        self
    }

    /// Check ranges: positive tolerance, non-zero cap, `0 < ω < 2`.
    pub fn validate(&self) -> Result<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(Fvm1dError::invalid_config(format!(
                "tolerance must be positive (got {})",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(Fvm1dError::invalid_config("iteration cap must be at least 1"));
        }
        if !(self.relaxation > 0.0 && self.relaxation < 2.0) {
            return Err(Fvm1dError::invalid_config(format!(
                "relaxation factor must lie in (0, 2) (got {})",
                self.relaxation
            )));
        }
        Ok(())
    }

    /// The concrete strategy used for `cells` unknowns.
    pub fn resolve(&self, cells: usize) -> SolverStrategy {
        match self.strategy {
            SolverStrategy::Auto if cells <= self.direct_threshold => SolverStrategy::GaussSeidel,
            SolverStrategy::Auto => SolverStrategy::Thomas,
            other => other,
        }
    }
}

/// Everything a solve produces.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SolveOutcome {
    /// Cell values with their mesh
    pub solution: Solution,
    /// Strategy actually run (never `Auto`)
    pub strategy: SolverStrategy,
    /// Sweeps performed; 1 for the direct solver
    pub iterations: usize,
    /// False when an iterative solve hit its cap above tolerance
    pub converged: bool,
    /// Max-norm change of the last sweep; 0 for the direct solver
    pub final_change: f64,
    /// Wall-clock time for meshing, assembly and solve
    pub elapsed: Duration,
    /// Stability report, when the caller ran the pre-check
    pub stability: Option<StabilityReport>,
}

impl SolveOutcome {
    /// Drop the diagnostics and keep the solution.
    pub fn into_solution(self) -> Solution {
        self.solution
    }
}

/// The finite-volume solver.
///
/// Holds only configuration, so one instance can serve any number of
/// independent solves, including from several threads.
#[derive(Debug, Clone, Default)]
pub struct FiniteVolumeSolver {
    config: SolverConfig,
}

impl FiniteVolumeSolver {
    /// Create a solver with the given configuration.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Build the mesh and assemble the linear system without solving it.
    pub fn discretize(&self, problem: &Problem) -> Result<(Mesh, TridiagonalSystem)> {
        validate_problem(problem)?;
        let mesh = Mesh::build(problem.cells(), problem.length(), problem.mesh_kind())?;
        let system = assemble(problem, &mesh);
        Ok((mesh, system))
    }

    /// Solve `problem`.
    ///
    /// Invalid problems and singular systems are errors. Iterative
    /// non-convergence is not: the best iterate comes back with
    /// `converged == false`.
    pub fn solve(&self, problem: &Problem) -> Result<SolveOutcome> {
        self.config.validate()?;
        let start = Instant::now();

        let (mesh, system) = self.discretize(problem)?;
        let strategy = self.config.resolve(mesh.len());
        log::debug!("solving {} cells with {strategy}", mesh.len());

        let (values, iterations, converged, final_change) = match strategy {
            SolverStrategy::GaussSeidel | SolverStrategy::Sor => {
                let omega = if strategy == SolverStrategy::Sor {
                    self.config.relaxation
                } else {
                    1.0
                };
                let result = GaussSeidel::with_config(
                    self.config.max_iterations,
                    self.config.tolerance,
                    omega,
                )
                .solve_from(&system, wall_profile(problem, &mesh))?;
                (
                    result.values,
                    result.iterations,
                    result.converged,
                    result.final_change,
                )
            }
            _ => (solve_thomas(system)?, 1, true, 0.0),
        };

        let solution =
            Solution::new(values, mesh)?.with_boundary_values(problem.u0(), problem.u_l());

        Ok(SolveOutcome {
            solution,
            strategy,
            iterations,
            converged,
            final_change,
            elapsed: start.elapsed(),
            stability: None,
        })
    }
}

/// Straight line between the two Dirichlet values, sampled at the centres.
///
/// Starting guess for iterative solves; exact for constant and linear
/// solutions.
fn wall_profile(problem: &Problem, mesh: &Mesh) -> Vec<f64> {
    let (u0, u_l) = (problem.u0(), problem.u_l());
    let length = mesh.length();
    mesh.centers()
        .iter()
        .map(|&x| u0 + (u_l - u0) * x / length)
        .collect()
}
