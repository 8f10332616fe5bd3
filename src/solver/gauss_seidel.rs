//! Gauss-Seidel / SOR iteration for tridiagonal systems.

use crate::error::{Fvm1dError, Result};

use super::system::TridiagonalSystem;
use super::{DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};

/// Result of an iterative solve.
#[derive(Debug, Clone, PartialEq)]
pub struct IterativeSolution {
    /// Last iterate (the best available one when not converged)
    pub values: Vec<f64>,
    /// Number of sweeps performed
    pub iterations: usize,
    /// Whether the max-norm change dropped below the tolerance
    pub converged: bool,
    /// Max-norm change of the last sweep
    pub final_change: f64,
}

/// Gauss-Seidel solver with optional over-relaxation.
///
/// Each sweep updates unknowns left to right using the newest neighbour
/// values, then blends with the previous iterate:
///   x[i] = (1 - ω)·x_old[i] + ω·(rhs[i] - lower[i-1]·x[i-1] - upper[i]·x[i+1]) / diag[i]
///
/// ω = 1 is plain Gauss-Seidel; `0 < ω < 2` is required for SOR convergence on
/// symmetric positive definite systems.
#[derive(Debug, Clone)]
pub struct GaussSeidel {
    /// Maximum number of sweeps
    pub max_iterations: usize,
    /// Max-norm change below which the iteration stops
    pub tolerance: f64,
    /// Relaxation factor ω
    pub relaxation: f64,
}

impl Default for GaussSeidel {
    fn default() -> Self {
        Self::new()
    }
}

impl GaussSeidel {
    /// Plain Gauss-Seidel with the default tolerance and iteration cap.
    pub fn new() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
            relaxation: 1.0,
        }
    }

    /// Create a solver with explicit settings.
    pub fn with_config(max_iterations: usize, tolerance: f64, relaxation: f64) -> Self {
        Self {
            max_iterations,
            tolerance,
            relaxation,
        }
    }

    /// Iterate from a zero initial guess.
    ///
    /// The system is only read. Exhausting the iteration budget is not an
    /// error: the last iterate is returned with `converged == false`. A zero
    /// diagonal entry makes the sweep undefined and fails with
    /// [`Fvm1dError::SingularSystem`].
    pub fn solve(&self, system: &TridiagonalSystem) -> Result<IterativeSolution> {
        self.solve_from(system, vec![0.0; system.size()])
    }

    /// Iterate from `initial`, which must hold one value per unknown.
    pub fn solve_from(
        &self,
        system: &TridiagonalSystem,
        initial: Vec<f64>,
    ) -> Result<IterativeSolution> {
        if initial.len() != system.size() {
            return Err(Fvm1dError::size_mismatch(system.size(), initial.len()));
        }
        if let Some(row) = system.diag.iter().position(|&d| d == 0.0 || !d.is_finite()) {
            return Err(Fvm1dError::singular(row, system.diag[row]));
        }

        let omega = self.relaxation;
        let mut x = initial;
        let mut change = f64::INFINITY;

        for iter in 0..self.max_iterations {
            change = self.sweep(system, &mut x, omega);

            if change < self.tolerance {
                log::info!(
                    "iterative solve converged in {} sweeps (change {change:.2e}, ω = {omega})",
                    iter + 1
                );
                return Ok(IterativeSolution {
                    values: x,
                    iterations: iter + 1,
                    converged: true,
                    final_change: change,
                });
            }

            if !change.is_finite() {
                log::warn!("iterative solve diverged after {} sweeps", iter + 1);
                return Ok(IterativeSolution {
                    values: x,
                    iterations: iter + 1,
                    converged: false,
                    final_change: change,
                });
            }
        }

        log::warn!(
            "iterative solve did not converge after {} sweeps (change {change:.2e} > {:.2e})",
            self.max_iterations,
            self.tolerance
        );
        Ok(IterativeSolution {
            values: x,
            iterations: self.max_iterations,
            converged: false,
            final_change: change,
        })
    }

    /// One relaxed sweep; returns the max-norm change.
    fn sweep(&self, system: &TridiagonalSystem, x: &mut [f64], omega: f64) -> f64 {
        let n = x.len();
        let mut max_diff = 0.0f64;
        let mut poisoned = false;

        for i in 0..n {
            let mut sigma = system.rhs[i];
            if i > 0 {
                sigma -= system.lower[i - 1] * x[i - 1];
            }
            if i + 1 < n {
                sigma -= system.upper[i] * x[i + 1];
            }
            let updated = (1.0 - omega) * x[i] + omega * sigma / system.diag[i];
            let diff = (updated - x[i]).abs();
            // f64::max drops NaN, so track it separately
            poisoned |= diff.is_nan();
            max_diff = max_diff.max(diff);
            x[i] = updated;
        }

        if poisoned {
            f64::NAN
        } else {
            max_diff
        }
    }
}
