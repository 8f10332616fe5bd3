//! Pluggable resolution methods.
//!
//! Callers that drive several discretisations through one interface (test
//! harnesses, comparison tools) hold a `dyn ResolutionMethod`.

use crate::analysis::analyze_problem;
use crate::error::Result;
use crate::problem::Problem;
use crate::solver::{FiniteVolumeSolver, SolveOutcome, SolverConfig};

/// A numerical method able to solve a [`Problem`].
pub trait ResolutionMethod: Send + Sync {
    /// Human-readable method name.
    fn name(&self) -> &str;

    /// Spatial dimension handled by the method.
    fn dimension(&self) -> usize;

    /// Solve `problem`.
    fn solve(&self, problem: &Problem) -> Result<SolveOutcome>;
}

/// Cell-centred finite volumes with upwind convection in one dimension.
///
/// Runs the stability analysis before each solve, logs a warning when the
/// mesh under-resolves the problem and attaches the report to the outcome.
#[derive(Debug, Clone)]
pub struct FiniteVolume1D {
    solver: FiniteVolumeSolver,
    check_stability: bool,
}

impl Default for FiniteVolume1D {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

impl FiniteVolume1D {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            solver: FiniteVolumeSolver::new(config),
            check_stability: true,
        }
    }

    /// Enable or disable the stability pre-check.
    pub fn with_stability_check(mut self, enabled: bool) -> Self {
        self.check_stability = enabled;
        self
    }

    pub fn config(&self) -> &SolverConfig {
        self.solver.config()
    }
}

impl ResolutionMethod for FiniteVolume1D {
    fn name(&self) -> &str {
        "finite volumes 1D"
    }

    fn dimension(&self) -> usize {
        1
    }

    fn solve(&self, problem: &Problem) -> Result<SolveOutcome> {
        let stability = self.check_stability.then(|| analyze_problem(problem));
        let mut outcome = self.solver.solve(problem)?;
        outcome.stability = stability;
        Ok(outcome)
    }
}
